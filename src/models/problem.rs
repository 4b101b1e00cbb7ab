use serde::{Deserialize, Deserializer, Serialize};

use crate::models::primitive::Primitive;

/// 题目难度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Difficulty {
    #[default]
    Basic = 1,
    Intermediate = 2,
    Advanced = 3,
}

impl Difficulty {
    pub fn level(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Basic => "basic",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Difficulty::Basic),
            2 => Ok(Difficulty::Intermediate),
            3 => Ok(Difficulty::Advanced),
            other => Err(format!("难度必须在 1-3 之间，收到 {}", other)),
        }
    }
}

impl From<Difficulty> for u8 {
    fn from(d: Difficulty) -> Self {
        d.level()
    }
}

/// 新题请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemRequest {
    pub primitive: Primitive,
    pub topic: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub previous_problem: Option<String>,
}

/// 模型生成的练习题
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedProblem {
    pub problem_text: String,
    pub correct_answer: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub hint1: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub hint2: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub worked_solution: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub chemistry_connection: String,
}

/// 模型偶尔把可选字段写成 `null`，按空字符串处理
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl GeneratedProblem {
    /// 补救题生成失败时使用的固定题目
    pub fn fallback() -> Self {
        Self {
            problem_text: "Try this: What is the bond angle in methane (CH4)?".to_string(),
            correct_answer: "109.5 degrees".to_string(),
            hint1: "Count the electron domains around the central carbon.".to_string(),
            hint2: "Four bonding pairs and no lone pairs give a tetrahedral shape.".to_string(),
            worked_solution: "Carbon in CH4 has four bonding pairs arranged tetrahedrally, \
                              so every H-C-H angle is about 109.5 degrees."
                .to_string(),
            chemistry_connection: "Tetrahedral carbon is the backbone geometry of organic chemistry."
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_deserializes_from_level() {
        let req: ProblemRequest =
            serde_json::from_str(r#"{"primitive":"RATE","topic":"kinetics","difficulty":2}"#).unwrap();
        assert_eq!(req.difficulty, Difficulty::Intermediate);
        assert!(req.previous_problem.is_none());
    }

    #[test]
    fn difficulty_out_of_range_is_rejected() {
        let err = serde_json::from_str::<ProblemRequest>(
            r#"{"primitive":"RATE","topic":"kinetics","difficulty":7}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn null_optional_fields_become_empty() {
        let problem: GeneratedProblem = serde_json::from_str(
            r#"{"problem_text":"How many moles in 44 g of CO2?","correct_answer":"1 mol","hint1":"Use molar mass","hint2":null,"worked_solution":null}"#,
        )
        .unwrap();
        assert_eq!(problem.hint1, "Use molar mass");
        assert_eq!(problem.hint2, "");
        assert_eq!(problem.worked_solution, "");
        assert_eq!(problem.chemistry_connection, "");
    }

    #[test]
    fn missing_difficulty_defaults_to_basic() {
        let req: ProblemRequest =
            serde_json::from_str(r#"{"primitive":"SPREAD","topic":"entropy"}"#).unwrap();
        assert_eq!(req.difficulty, Difficulty::Basic);
    }
}
