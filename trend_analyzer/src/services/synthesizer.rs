use chrono::{DateTime, Duration, TimeZone, Timelike};
use rand::Rng;

use crate::models::{AnalysisMetrics, ChartPoint};

pub const CHART_HOURS: usize = 24;
const BASE_HEAT: f64 = 100_000.0;
const MAX_PHASE_OFFSET: f64 = 5.0;

/// Форма кривой одной платформы.
#[derive(Debug, Clone, Copy)]
struct SeriesShape {
    multiplier: f64,
    period_divisor: f64,
    volatility_weight: f64,
    random_spread: f64,
}

const WEIBO: SeriesShape = SeriesShape {
    multiplier: 1.0,
    period_divisor: 3.0,
    volatility_weight: 0.8,
    random_spread: 0.2,
};

const DOUYIN: SeriesShape = SeriesShape {
    multiplier: 1.2,
    period_divisor: 2.5,
    volatility_weight: 0.9,
    random_spread: 0.3,
};

const KUAISHOU: SeriesShape = SeriesShape {
    multiplier: 0.8,
    period_divisor: 4.0,
    volatility_weight: 0.6,
    random_spread: 0.2,
};

impl SeriesShape {
    // volatility_weight < 1, поэтому значение всегда положительно
    fn value_at<R: Rng>(&self, rng: &mut R, hour_index: usize, offset: f64) -> u64 {
        let wave = ((hour_index as f64 + offset) / self.period_divisor).sin();
        let noise = rng.gen_range(0.0..self.random_spread);
        let value = BASE_HEAT * self.multiplier * (1.0 + wave * self.volatility_weight + noise);
        value.floor().max(0.0) as u64
    }
}

/// Подпись часа "HH:00" для момента `hours_back` часов назад от `now`.
fn hour_label<Tz: TimeZone>(now: &DateTime<Tz>, hours_back: i64) -> String {
    let time = now.clone() - Duration::hours(hours_back);
    format!("{:02}:00", time.hour())
}

/// Синтезирует почасовой ряд за последние 24 часа, заканчивая часом `now`.
pub fn generate_chart_data<R, Tz>(rng: &mut R, now: &DateTime<Tz>) -> Vec<ChartPoint>
where
    R: Rng,
    Tz: TimeZone,
{
    let offset_weibo = rng.gen_range(0.0..MAX_PHASE_OFFSET);
    let offset_douyin = rng.gen_range(0.0..MAX_PHASE_OFFSET);
    let offset_kuaishou = rng.gen_range(0.0..MAX_PHASE_OFFSET);

    (0..CHART_HOURS)
        .map(|i| ChartPoint {
            time: hour_label(now, (CHART_HOURS - 1 - i) as i64),
            weibo: WEIBO.value_at(&mut *rng, i, offset_weibo),
            douyin: DOUYIN.value_at(&mut *rng, i, offset_douyin),
            kuaishou: KUAISHOU.value_at(&mut *rng, i, offset_kuaishou),
        })
        .collect()
}

/// Максимум одной платформы и сумма всех значений по всем точкам.
pub fn chart_totals(chart: &[ChartPoint]) -> (u64, u64) {
    chart.iter().fold((0, 0), |(peak, total), point| {
        (peak.max(point.peak()), total + point.total())
    })
}

/// Синтетическая волатильность: не вычисляется из ряда.
pub fn synthetic_volatility<R: Rng>(rng: &mut R) -> u32 {
    rng.gen_range(40..80)
}

pub fn derive_metrics(chart: &[ChartPoint], sentiment_score: f64, volatility: u32) -> AnalysisMetrics {
    let (peak_value, total_mentions) = chart_totals(chart);
    AnalysisMetrics {
        peak_value,
        volatility,
        sentiment_score,
        total_mentions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 3, 5, 42, 10).unwrap()
    }

    #[test]
    fn test_chart_has_24_positive_points() {
        let mut rng = StdRng::seed_from_u64(7);
        let chart = generate_chart_data(&mut rng, &fixed_now());
        assert_eq!(chart.len(), CHART_HOURS);
        for point in &chart {
            assert!(point.weibo > 0 && point.douyin > 0 && point.kuaishou > 0);
        }
    }

    #[test]
    fn test_labels_are_consecutive_hours_ending_now() {
        let mut rng = StdRng::seed_from_u64(1);
        let chart = generate_chart_data(&mut rng, &fixed_now());

        assert_eq!(chart.first().unwrap().time, "06:00");
        assert_eq!(chart.last().unwrap().time, "05:00");
        // Переход через полночь
        let midnight = chart.iter().position(|p| p.time == "00:00").unwrap();
        assert_eq!(chart[midnight - 1].time, "23:00");

        for pair in chart.windows(2) {
            let prev: u32 = pair[0].time[..2].parse().unwrap();
            let next: u32 = pair[1].time[..2].parse().unwrap();
            assert_eq!((prev + 1) % 24, next);
        }
    }

    #[test]
    fn test_same_seed_gives_same_chart() {
        let now = fixed_now();
        let a = generate_chart_data(&mut StdRng::seed_from_u64(42), &now);
        let b = generate_chart_data(&mut StdRng::seed_from_u64(42), &now);
        let c = generate_chart_data(&mut StdRng::seed_from_u64(43), &now);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_values_stay_in_expected_band() {
        let mut rng = StdRng::seed_from_u64(99);
        let chart = generate_chart_data(&mut rng, &fixed_now());
        for point in &chart {
            // 100000 * 1.2 * (1 + 0.9 + 0.3)
            assert!(point.peak() < 264_000);
        }
    }

    #[test]
    fn test_metrics_match_recomputed_values() {
        let mut rng = StdRng::seed_from_u64(5);
        let chart = generate_chart_data(&mut rng, &fixed_now());
        let metrics = derive_metrics(&chart, 0.3, 55);

        let expected_peak = chart
            .iter()
            .flat_map(|p| [p.weibo, p.douyin, p.kuaishou])
            .max()
            .unwrap();
        let expected_total: u64 = chart.iter().map(|p| p.weibo + p.douyin + p.kuaishou).sum();

        assert_eq!(metrics.peak_value, expected_peak);
        assert_eq!(metrics.total_mentions, expected_total);
        assert_eq!(metrics.volatility, 55);
        assert_eq!(metrics.sentiment_score, 0.3);
    }

    #[test]
    fn test_synthetic_volatility_range() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let v = synthetic_volatility(&mut rng);
            assert!((40..80).contains(&v));
        }
    }

    #[test]
    fn test_empty_chart_totals() {
        assert_eq!(chart_totals(&[]), (0, 0));
    }
}
