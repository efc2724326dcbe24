use rand::Rng;

use crate::models::{Platform, TrendItem};

const TOP_HEAT: u64 = 10_000_000;
const HEAT_STEP: u64 = 800_000;
const HEAT_JITTER: u64 = 50_000;

fn titles(platform: Platform) -> [&'static str; 10] {
    match platform {
        Platform::Weibo => [
            "AI开源模型解析", "国产芯片新突破", "火星探测新发现", "全球气候峰会", "故宫初雪摄影",
            "央行数字货币", "量子计算里程碑", "自动驾驶法规", "非遗文化传承", "脑机接口实验",
        ],
        Platform::Douyin => [
            "汉服变装挑战", "赛博长安概念视频", "AI绘画挑战赛", "非遗手工制作", "全息投影古风",
            "古镇生活Vlog", "国风舞蹈翻跳", "复古科幻混剪", "水墨动画特效", "茶道艺术展示",
        ],
        Platform::Kuaishou => [
            "乡村发明家木牛流马", "硬核手工榫卯结构", "无人机航拍长城", "传统陶瓷制作", "废旧零件改造机甲",
            "民间绝活展示", "皮影戏创新", "农耕文明展示", "微缩景观制作", "极客工作室探秘",
        ],
    }
}

fn label_for(index: usize) -> &'static str {
    match index {
        0..=2 => "爆",
        3..=5 => "热",
        _ => "新",
    }
}

fn platform_slug(platform: Platform) -> &'static str {
    match platform {
        Platform::Weibo => "weibo",
        Platform::Douyin => "douyin",
        Platform::Kuaishou => "kuaishou",
    }
}

/// Макетный список горячих тем платформы. Меняется только `heat`.
pub fn get_hot_list<R: Rng>(platform: Platform, rng: &mut R) -> Vec<TrendItem> {
    titles(platform)
        .iter()
        .enumerate()
        .map(|(index, title)| TrendItem {
            id: format!("{}-{}", platform_slug(platform), index),
            rank: index as u32 + 1,
            title: title.to_string(),
            heat: TOP_HEAT - index as u64 * HEAT_STEP + rng.gen_range(0..HEAT_JITTER),
            platform,
            label: label_for(index).to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_hot_list_shape() {
        let mut rng = StdRng::seed_from_u64(3);
        for platform in Platform::ALL {
            let items = get_hot_list(platform, &mut rng);
            assert_eq!(items.len(), 10);
            for (index, item) in items.iter().enumerate() {
                assert_eq!(item.rank as usize, index + 1);
                assert_eq!(item.platform, platform);
                let floor = TOP_HEAT - index as u64 * HEAT_STEP;
                assert!(item.heat >= floor && item.heat < floor + HEAT_JITTER);
            }
        }
    }

    #[test]
    fn test_labels_by_rank_band() {
        let mut rng = StdRng::seed_from_u64(4);
        let items = get_hot_list(Platform::Douyin, &mut rng);
        let labels: Vec<&str> = items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, ["爆", "爆", "爆", "热", "热", "热", "新", "新", "新", "新"]);
        assert_eq!(items[0].id, "douyin-0");
        assert_eq!(items[0].title, "汉服变装挑战");
    }

    #[test]
    fn test_heat_is_descending() {
        let mut rng = StdRng::seed_from_u64(8);
        let items = get_hot_list(Platform::Kuaishou, &mut rng);
        for pair in items.windows(2) {
            assert!(pair[0].heat > pair[1].heat);
        }
    }
}
