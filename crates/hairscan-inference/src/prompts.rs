//! Prompt templates for the hosted completion API.

use hairscan_core::{AnalysisResult, Result};

/// Instruction sent with the image for feature extraction.
pub const FEATURE_EXTRACTION_PROMPT: &str = r#"你是一位专业的毛发健康分析师，请根据这张头发照片提取以下结构化数据。

分析要求：
1. 基于图片中可见的特征进行评估
2. 保持客观、专业
3. 只返回 JSON，不要附加解释

字段说明：
- density_score：头发密度评分（0-100），数值越高头发越浓密
- scalp_exposure_percent：头皮暴露率（0-100 的百分比），越高越稀疏
- parting_width_px：发缝宽度（像素），越宽说明顶部越稀
- baby_hairs_visible：是否可见新生绒毛（true/false），可见说明处于恢复状态
- stage：恢复阶段（0-3 的整数）
  - 0 = 掉发期（暴露明显，无绒毛）
  - 1 = 新生绒毛期（开始恢复）
  - 2 = 增长期（发缝收窄）
  - 3 = 稳定维护期（基本恢复）

可选字段（图片能判断时才填写）：
- hairline_stability：发际线是否稳定（true/false）
- left_right_symmetry：左右对称情况（"正常" / "不对称" / "未知"）

返回格式示例：
{
  "density_score": 63,
  "scalp_exposure_percent": 22.5,
  "parting_width_px": 9.7,
  "baby_hairs_visible": true,
  "stage": 1,
  "hairline_stability": true,
  "left_right_symmetry": "正常"
}"#;

/// Build the advice prompt embedding the full analysis as JSON.
pub fn advice_prompt(analysis: &AnalysisResult) -> Result<String> {
    let data = serde_json::to_string_pretty(analysis)?;
    Ok(format!(
        r#"你是一位温暖的毛发恢复顾问，请根据以下分析结果，用温暖鼓励的语气回复。

数据：
{data}

请输出：
1. summary：一句话的状态总结（温暖、鼓励）
2. advice：一句话的恢复建议（具体、可操作）

只返回 JSON，格式如下：
{{
  "summary": "你正处于新生绒毛期，恢复初见成效！",
  "advice": "建议继续保持营养补充和规律作息，坚持记录变化"
}}"#
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_prompt_names_every_field() {
        for field in [
            "density_score",
            "scalp_exposure_percent",
            "parting_width_px",
            "baby_hairs_visible",
            "stage",
            "hairline_stability",
            "left_right_symmetry",
        ] {
            assert!(FEATURE_EXTRACTION_PROMPT.contains(field), "missing {}", field);
        }
    }

    #[test]
    fn test_advice_prompt_embeds_analysis() {
        let analysis = AnalysisResult {
            density_score: 71.0,
            scalp_exposure_percent: 15.5,
            parting_width_px: 7.2,
            baby_hairs_visible: true,
            raw_stage: 2,
            hairline_stability: None,
            left_right_symmetry: None,
        };
        let prompt = advice_prompt(&analysis).unwrap();
        assert!(prompt.contains("\"density_score\": 71.0"));
        assert!(prompt.contains("\"stage\": 2"));
        assert!(prompt.contains("\"summary\""));
        assert!(prompt.contains("\"advice\""));
    }
}
