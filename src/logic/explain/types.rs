use serde::{Deserialize, Serialize};

/// One ranked factor as shown to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorExplanation {
    pub name: String,
    pub readable_name: String,
    pub importance: f64, // static model weight, 0-1
    pub percent: u32,
    pub description: Option<String>,
}

/// One axis of the "you vs average" profile, both values normalized 0-1
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileAxis {
    pub label: String,
    pub user_value: f64,
    pub reference_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub label: String,
    pub value: String,
    pub verdict: String,
    pub above_typical: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub profile: Vec<ProfileAxis>,
    pub factors: Vec<FactorExplanation>,
    pub insights: Vec<String>,
    pub tip: Option<String>,
    pub comparisons: Vec<Comparison>,
    pub facts: Vec<String>,
}
