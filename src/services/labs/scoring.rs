//! 实验评分计算（纯函数）

use std::collections::HashMap;

use crate::models::labs::{
    entities::{BreakdownEntry, RubricCriterion, ScoreAnnotation},
    responses::{GradeDistribution, ScoreStatistics},
};

pub const ANNOTATION_AUTO: &str = "auto";
pub const ANNOTATION_MANUAL: &str = "manual";
pub const NOT_GRADED: &str = "Not Graded";

/// 数值比较的相对容差
const RELATIVE_TOLERANCE: f64 = 0.01;
/// 期望值为 0 时的绝对容差
const ZERO_TOLERANCE: f64 = 1e-9;

/// 自动评分结果
#[derive(Debug, Clone, PartialEq)]
pub struct AutoScore {
    pub auto_score: f64,
    pub max_score: f64,
    pub breakdown: Vec<BreakdownEntry>,
}

/// 作答与期望值是否一致：忽略大小写与首尾空白，数值按 1% 相对容差比较
pub fn answers_match(given: &str, expected: &str) -> bool {
    let given = given.trim();
    let expected = expected.trim();

    if let (Ok(g), Ok(e)) = (given.parse::<f64>(), expected.parse::<f64>())
        && g.is_finite()
        && e.is_finite()
    {
        if e == 0.0 {
            return g.abs() <= ZERO_TOLERANCE;
        }
        return ((g - e) / e).abs() <= RELATIVE_TOLERANCE;
    }

    given.to_lowercase() == expected.to_lowercase()
}

/// JSON 作答值转为比较用的文本
pub fn response_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

pub fn percentage(score: f64, max: f64) -> f64 {
    if max > 0.0 { score / max * 100.0 } else { 0.0 }
}

fn breakdown_entry(
    criterion: &RubricCriterion,
    awarded_points: f64,
    teacher_comment: Option<String>,
    annotation_type: &str,
) -> BreakdownEntry {
    BreakdownEntry {
        criterion_id: criterion.id,
        name: criterion.name.clone(),
        max_points: criterion.max_points,
        awarded_points,
        teacher_comment,
        annotation_type: annotation_type.to_string(),
        percentage: percentage(awarded_points, criterion.max_points),
    }
}

/// 单项自动得分；没有期望值的标准记 0 分并标记为人工
fn criterion_points(criterion: &RubricCriterion, responses: &serde_json::Value) -> (f64, &'static str) {
    let (Some(key), Some(expected)) = (&criterion.response_key, &criterion.expected_value) else {
        return (0.0, ANNOTATION_MANUAL);
    };
    let matched = responses
        .get(key)
        .and_then(response_text)
        .is_some_and(|given| answers_match(&given, expected));
    (if matched { criterion.max_points } else { 0.0 }, ANNOTATION_AUTO)
}

/// 按评分标准自动评分
pub fn auto_score(criteria: &[RubricCriterion], responses: &serde_json::Value) -> AutoScore {
    let mut auto_score = 0.0;
    let mut max_score = 0.0;
    let mut breakdown = Vec::with_capacity(criteria.len());

    for criterion in criteria {
        let (awarded, kind) = criterion_points(criterion, responses);
        auto_score += awarded * criterion.weight;
        max_score += criterion.max_points * criterion.weight;
        breakdown.push(breakdown_entry(criterion, awarded, None, kind));
    }

    AutoScore {
        auto_score,
        max_score,
        breakdown,
    }
}

pub fn final_score(manual: Option<f64>, auto: Option<f64>) -> Option<f64> {
    manual.or(auto)
}

pub fn letter_grade(final_score: Option<f64>, max_score: f64) -> &'static str {
    let Some(score) = final_score else {
        return NOT_GRADED;
    };
    match percentage(score, max_score) {
        p if p >= 90.0 => "A",
        p if p >= 80.0 => "B",
        p if p >= 70.0 => "C",
        p if p >= 60.0 => "D",
        _ => "F",
    }
}

/// 按批注重建明细；未批注的标准沿用原自动得分
pub fn rebuild_breakdown(
    criteria: &[RubricCriterion],
    annotations: &[ScoreAnnotation],
    previous: &[BreakdownEntry],
) -> Vec<BreakdownEntry> {
    let by_criterion: HashMap<i64, &ScoreAnnotation> =
        annotations.iter().map(|a| (a.criterion_id, a)).collect();
    let previous: HashMap<i64, &BreakdownEntry> =
        previous.iter().map(|b| (b.criterion_id, b)).collect();

    criteria
        .iter()
        .map(|criterion| match by_criterion.get(&criterion.id) {
            Some(annotation) => breakdown_entry(
                criterion,
                annotation.points_awarded,
                annotation.teacher_comment.clone(),
                &annotation.annotation_type,
            ),
            None => {
                let (points, kind) = previous
                    .get(&criterion.id)
                    .map(|p| (p.awarded_points, p.annotation_type.as_str()))
                    .unwrap_or((0.0, ANNOTATION_AUTO));
                breakdown_entry(criterion, points, None, kind)
            }
        })
        .collect()
}

pub fn breakdown_total(breakdown: &[BreakdownEntry]) -> f64 {
    breakdown.iter().map(|b| b.awarded_points).sum()
}

/// 成绩统计（总体标准差）；未评分的不计入均值等指标
pub fn statistics(final_scores: &[Option<f64>]) -> ScoreStatistics {
    let graded: Vec<f64> = final_scores.iter().flatten().copied().collect();
    let mut stats = ScoreStatistics {
        count: final_scores.len() as i64,
        graded_count: graded.len() as i64,
        ..Default::default()
    };
    if graded.is_empty() {
        return stats;
    }

    let n = graded.len() as f64;
    let mean = graded.iter().sum::<f64>() / n;
    let variance = graded.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;

    stats.average = mean;
    stats.min = graded.iter().copied().fold(f64::INFINITY, f64::min);
    stats.max = graded.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    stats.std_dev = variance.sqrt();
    stats
}

pub fn tally_grade(distribution: &mut GradeDistribution, grade: &str) {
    match grade {
        "A" => distribution.a += 1,
        "B" => distribution.b += 1,
        "C" => distribution.c += 1,
        "D" => distribution.d += 1,
        "F" => distribution.f += 1,
        _ => distribution.not_graded += 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn criterion(id: i64, max: f64, weight: f64, key: Option<&str>, expected: Option<&str>) -> RubricCriterion {
        RubricCriterion {
            id,
            lab_id: 1,
            name: format!("c{id}"),
            description: None,
            max_points: max,
            weight,
            order_index: id as i32,
            response_key: key.map(str::to_string),
            expected_value: expected.map(str::to_string),
        }
    }

    #[test]
    fn test_answers_match() {
        assert!(answers_match("  Oxygen ", "oxygen"));
        assert!(answers_match("9.85", "9.8"));
        assert!(!answers_match("10", "9.8"));
        assert!(answers_match("0", "0.0"));
        assert!(!answers_match("0.001", "0"));
        assert!(!answers_match("north", "south"));
    }

    #[test]
    fn test_auto_score_weighted() {
        let criteria = vec![
            criterion(1, 10.0, 2.0, Some("g"), Some("9.8")),
            criterion(2, 5.0, 1.0, Some("gas"), Some("Oxygen")),
            criterion(3, 5.0, 1.0, None, None),
        ];
        let result = auto_score(&criteria, &json!({"g": 9.81, "gas": "nitrogen"}));
        assert_eq!(result.auto_score, 20.0);
        assert_eq!(result.max_score, 30.0);
        assert_eq!(result.breakdown[0].percentage, 100.0);
        assert_eq!(result.breakdown[1].awarded_points, 0.0);
        assert_eq!(result.breakdown[2].annotation_type, ANNOTATION_MANUAL);
    }

    #[test]
    fn test_final_score_and_letter() {
        assert_eq!(final_score(Some(7.0), Some(9.0)), Some(7.0));
        assert_eq!(final_score(None, Some(9.0)), Some(9.0));
        assert_eq!(letter_grade(Some(90.0), 100.0), "A");
        assert_eq!(letter_grade(Some(89.9), 100.0), "B");
        assert_eq!(letter_grade(Some(59.0), 100.0), "F");
        assert_eq!(letter_grade(None, 100.0), NOT_GRADED);
        assert_eq!(letter_grade(Some(5.0), 0.0), "F");
    }

    #[test]
    fn test_rebuild_breakdown_falls_back_to_auto() {
        let criteria = vec![criterion(1, 10.0, 1.0, None, None), criterion(2, 10.0, 1.0, None, None)];
        let previous = vec![
            breakdown_entry(&criteria[0], 10.0, None, ANNOTATION_AUTO),
            breakdown_entry(&criteria[1], 4.0, None, ANNOTATION_AUTO),
        ];
        let annotations = vec![ScoreAnnotation {
            id: 1,
            score_id: 1,
            criterion_id: 2,
            points_awarded: 6.0,
            teacher_comment: Some("ok".into()),
            annotation_type: "partial".into(),
            created_by: Some(9),
            updated_at: chrono::Utc::now(),
        }];
        let rebuilt = rebuild_breakdown(&criteria, &annotations, &previous);
        assert_eq!(rebuilt[0].awarded_points, 10.0);
        assert_eq!(rebuilt[1].awarded_points, 6.0);
        assert_eq!(rebuilt[1].teacher_comment.as_deref(), Some("ok"));
        assert_eq!(breakdown_total(&rebuilt), 16.0);
    }

    #[test]
    fn test_statistics_population_std_dev() {
        let stats = statistics(&[Some(2.0), Some(4.0), Some(4.0), Some(4.0), Some(5.0), Some(5.0), Some(7.0), Some(9.0), None]);
        assert_eq!(stats.count, 9);
        assert_eq!(stats.graded_count, 8);
        assert_eq!(stats.average, 5.0);
        assert_eq!(stats.std_dev, 2.0);
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 9.0);
        assert_eq!(statistics(&[]), ScoreStatistics::default());
    }
}
