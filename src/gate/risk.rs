#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Normal,
    Elevated,
}

/// 그룹 이름 키워드 기반 위험도 분류기 (대소문자 무시 부분 문자열 매칭)
#[derive(Debug, Clone)]
pub struct RiskClassifier {
    keywords: Vec<String>,
}

impl RiskClassifier {
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Self {
        let keywords = keywords
            .iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keywords }
    }

    pub fn classify(&self, group: &str) -> RiskLevel {
        let group = group.to_lowercase();
        if self.keywords.iter().any(|k| group.contains(k.as_str())) {
            RiskLevel::Elevated
        } else {
            RiskLevel::Normal
        }
    }
}

impl Default for RiskClassifier {
    fn default() -> Self {
        Self::new(&["prod", "production"])
    }
}
