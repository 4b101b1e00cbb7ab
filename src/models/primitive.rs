/// 课程使用的九个认知原语
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Primitive {
    Collection,
    Arrangement,
    Direction,
    Proximity,
    Sameness,
    Change,
    Rate,
    Accumulation,
    Spread,
}

/// 原语 → 课题（有序）
static TOPICS: phf::Map<&'static str, &'static [&'static str]> = phf::phf_map! {
    "COLLECTION" => &["moles", "electron_shells", "isomer_counting"],
    "ARRANGEMENT" => &["stereoisomers", "crystal_packing", "mo_diagrams"],
    "DIRECTION" => &["bond_angles", "dipoles", "orbital_orientation"],
    "PROXIMITY" => &["potential_energy", "reaction_coordinates", "intermolecular_forces"],
    "SAMENESS" => &["molecular_symmetry", "resonance", "conservation_laws"],
    "CHANGE" => &["reaction_progress", "phase_transitions", "electron_transfer"],
    "RATE" => &["kinetics", "half_life", "diffusion"],
    "ACCUMULATION" => &["work", "heat", "total_yield"],
    "SPREAD" => &["boltzmann_distribution", "entropy", "orbital_probability"],
};

impl Primitive {
    /// 课程中的固定顺序
    pub const ALL: [Primitive; 9] = [
        Primitive::Collection,
        Primitive::Arrangement,
        Primitive::Direction,
        Primitive::Proximity,
        Primitive::Sameness,
        Primitive::Change,
        Primitive::Rate,
        Primitive::Accumulation,
        Primitive::Spread,
    ];

    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            Primitive::Collection => "COLLECTION",
            Primitive::Arrangement => "ARRANGEMENT",
            Primitive::Direction => "DIRECTION",
            Primitive::Proximity => "PROXIMITY",
            Primitive::Sameness => "SAMENESS",
            Primitive::Change => "CHANGE",
            Primitive::Rate => "RATE",
            Primitive::Accumulation => "ACCUMULATION",
            Primitive::Spread => "SPREAD",
        }
    }

    /// 从名称解析（不区分大小写）
    pub fn from_name(s: &str) -> Option<Self> {
        let upper = s.trim().to_ascii_uppercase();
        Self::ALL.into_iter().find(|p| p.name() == upper)
    }

    /// 该原语下的课题
    pub fn topics(self) -> &'static [&'static str] {
        TOPICS.get(self.name()).copied().unwrap_or(&[])
    }

    /// 课题是否属于该原语
    pub fn has_topic(self, topic: &str) -> bool {
        self.topics().contains(&topic)
    }
}

impl std::fmt::Display for Primitive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 完整的原语分类表，按课程顺序
pub fn list_primitives() -> Vec<(Primitive, &'static [&'static str])> {
    Primitive::ALL.iter().map(|p| (*p, p.topics())).collect()
}

/// 提示词中使用的原语清单
pub fn taxonomy_line() -> String {
    Primitive::ALL
        .iter()
        .map(|p| p.name())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_has_nine_primitives_with_three_topics_each() {
        let all = list_primitives();
        assert_eq!(all.len(), 9);
        assert!(all.iter().all(|(_, topics)| topics.len() == 3));
        assert_eq!(all[2], (Primitive::Direction, &["bond_angles", "dipoles", "orbital_orientation"][..]));
    }

    #[test]
    fn from_name_is_case_insensitive() {
        assert_eq!(Primitive::from_name("rate"), Some(Primitive::Rate));
        assert_eq!(Primitive::from_name(" Spread "), Some(Primitive::Spread));
        assert_eq!(Primitive::from_name("GRAVITY"), None);
    }

    #[test]
    fn serde_uses_upper_case_names() {
        let json = serde_json::to_string(&Primitive::Accumulation).unwrap();
        assert_eq!(json, "\"ACCUMULATION\"");
        let parsed: Primitive = serde_json::from_str("\"DIRECTION\"").unwrap();
        assert_eq!(parsed, Primitive::Direction);
        assert!(Primitive::Direction.has_topic("bond_angles"));
    }
}
