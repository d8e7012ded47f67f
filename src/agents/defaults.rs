//! Built-in review pipeline for medical device registration submissions.

use super::AgentSpec;

/// Model used when an agent does not name one
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// The five-step submission review chain: extraction, clinical, technical,
/// compliance, then a consolidated report that reads all earlier outputs.
pub fn default_agents() -> Vec<AgentSpec> {
    vec![
        AgentSpec::new(
            "1",
            "1. 申請資料提取器 (Extraction)",
            "你是一位專業的醫療器材法規專家。請從文件中提取關鍵行政資訊：廠商名稱、地址、產品名稱、類別、證書編號、日期。若有不確定資訊請標註。輸出為Markdown表格。",
            "分析文件並提取申請基本資料：",
        )
        .with_description("提取基本行政資料、廠商資訊、證書細節。")
        .with_temperature(0.0)
        .with_max_tokens(2000),
        AgentSpec::new(
            "2",
            "2. 適應症與禁忌症分析 (Clinical)",
            "你是臨床醫學專家。請分析文件的：1. 適應症 (Indications) 2. 禁忌症 (Contraindications) 3. 副作用與警語。請用列點方式呈現，並標註風險等級。",
            "請分析以下內容的臨床相關資訊：",
        )
        .with_description("分析產品適應症、禁忌症及副作用。")
        .with_temperature(0.3)
        .with_max_tokens(1500),
        AgentSpec::new(
            "3",
            "3. 技術規格與檢驗摘要 (Technical)",
            "你是生醫工程專家。請摘要：1. 產品技術規格 2. 已進行的測試項目 (如生物相容性、電性安全) 3. 檢驗結果摘要。忽略過於瑣碎的數據，只抓重點。",
            "請摘要技術規格與檢驗結果：",
        )
        .with_description("摘要產品技術規格、檢驗標準與測試結果。")
        .with_temperature(0.2)
        .with_max_tokens(1500),
        AgentSpec::new(
            "4",
            "4. 法規符合性檢查 (Compliance)",
            "你是資深法規稽核員。根據前述資訊與原文，檢查：1. 是否符合醫療器材分類分級規定？ 2. 標示是否包含必要警語？ 3. 是否有明顯缺漏文件？提供審查建議。",
            "請進行法規符合性檢查並提供建議：",
        )
        .with_description("根據TFDA要求檢查文件完整性與合規性。")
        .with_temperature(0.4)
        .with_max_tokens(1500),
        AgentSpec::new(
            "5",
            "5. 綜合審查報告生成 (Reporting)",
            "你是審查報告主筆。請根據上下文提供的所有分析結果，撰寫一份結構完整的「醫療器材查驗登記審查報告」。包含：摘要、產品描述、臨床評估、技術評估、結論與建議。",
            "請撰寫綜合審查報告：",
        )
        .with_description("整合所有分析，生成最終審查報告。")
        .with_temperature(0.5)
        .with_max_tokens(3000),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_agents_are_valid_and_unique() {
        let agents = default_agents();
        assert_eq!(agents.len(), 5);

        let ids: HashSet<_> = agents.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids.len(), agents.len());

        for agent in &agents {
            agent.validate().unwrap();
            assert_eq!(agent.model, DEFAULT_MODEL);
        }
    }

    #[test]
    fn test_reporting_agent_runs_last() {
        let agents = default_agents();
        assert!(agents.last().unwrap().name.contains("Reporting"));
        assert_eq!(agents.last().unwrap().max_tokens, 3000);
    }
}
