use serde::{Deserialize, Serialize};

/// The finished result of one pipeline run.
///
/// `comments` and `translated_comments` hold at most the first 20 entries of
/// the respective sequences; `extracted_count` is the pre-truncation total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoAnalysis {
    pub extracted_count: usize,
    pub comments: Vec<String>,
    pub translated_comments: Vec<String>,
    pub summary: Summary,
}

/// Final summary of the comment corpus.
///
/// The LLM is asked for a strict JSON object; when it complies the summary is
/// structured, otherwise the joined chunk summaries are kept as plain text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Summary {
    Structured(CommentAnalysis),
    Text(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommentAnalysis {
    #[serde(default)]
    pub overall_summary: Vec<String>,
    #[serde(default)]
    pub main_issues: Vec<MainIssue>,
    #[serde(default)]
    pub root_cause_hypotheses: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MainIssue {
    #[serde(default)]
    pub title: String,
    /// Free-form frequency estimate, e.g. "Many viewers" or "5 times".
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub representative_comment: String,
}
