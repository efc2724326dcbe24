/// Ключи JSON-объекта, который модель обязана вернуть. Тот же набор
/// читает `normalizer::parse_content`.
pub const RESPONSE_KEYS: [&str; 8] = [
    "summary",
    "intelligence",
    "keySources",
    "keywords",
    "poem",
    "historicalAnalogy",
    "sentimentScore",
    "extractedImageUrl",
];

/// Строит инструкцию для модели. Тема вставляется без изменений.
pub fn build_analysis_prompt(topic: &str) -> String {
    let schema = RESPONSE_KEYS
        .iter()
        .map(|key| format!("        \"{}\": {}", key, field_hint(key)))
        .collect::<Vec<_>>()
        .join(",\n");

    format!(
        "你是一位博古通今的中国文人兼现代数据分析师。请使用Google搜索获取\"{topic}\"的最新实时信息。\n\
        \n\
        任务：\n\
        1. 分析该话题在当代中国社交媒体（微博、抖音、快手）上的流行趋势。\n\
        2. 创作一首四句诗（五言或七言），以古风隐喻的形式描述这一现象（字段名：poem）。\n\
        3. 寻找一个中国历史典故或古代哲学思想，与该热点事件进行类比（字段名：historicalAnalogy）。\n\
        4. 尝试从搜索结果中提取一张主要相关图片的URL（字段名：extractedImageUrl）。\n\
        \n\
        请返回一个纯JSON对象。不要包含Markdown格式。\n\
        JSON对象必须包含以下字段:\n\
        {{\n{schema}\n      }}\n\
        \n\
        确保所有文本为中文。",
        topic = topic,
        schema = schema,
    )
}

fn field_hint(key: &str) -> &'static str {
    match key {
        "summary" => "\"一段简练、文雅的摘要（最多3句话）。\"",
        "intelligence" => "\"一段深度的舆情分析，语言风格要客观但带有文人气息。\"",
        "keySources" => "[\"列出4个具体的情报来源类型\"]",
        "keywords" => "[\"提取4个核心关键词，最好是两个字的词\"]",
        "poem" => "\"在这里填入创作的诗句，用换行符分隔每一句。\"",
        "historicalAnalogy" => "\"在这里填入历史典故类比，解释它与当下的联系。\"",
        "sentimentScore" => "0.5 (一个-1到1之间的数字)",
        "extractedImageUrl" => "\"如果找到相关新闻图片URL，填在这里，否则留空\"",
        _ => "\"\"",
    }
}
