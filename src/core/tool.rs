//! Orthologous clustering tools and the pairs they are compared in

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Number of clustering tools reconciled in one run
pub const TOOL_COUNT: usize = 4;

/// One of the clustering programs whose OG assignments are reconciled.
///
/// The declaration order is the fixed slot order of every cross-reference
/// record, so `Broccoli` is always slot 0 and `SonicParanoid` slot 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrthologyTool {
    Broccoli,
    OrthoFinder,
    ProteinOrtho,
    SonicParanoid,
}

impl OrthologyTool {
    pub const ALL: [OrthologyTool; TOOL_COUNT] = [
        OrthologyTool::Broccoli,
        OrthologyTool::OrthoFinder,
        OrthologyTool::ProteinOrtho,
        OrthologyTool::SonicParanoid,
    ];

    /// Slot of this tool inside a cross-reference record
    pub fn slot(self) -> usize {
        match self {
            OrthologyTool::Broccoli => 0,
            OrthologyTool::OrthoFinder => 1,
            OrthologyTool::ProteinOrtho => 2,
            OrthologyTool::SonicParanoid => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            OrthologyTool::Broccoli => "Broccoli",
            OrthologyTool::OrthoFinder => "OrthoFinder",
            OrthologyTool::ProteinOrtho => "ProteinOrtho",
            OrthologyTool::SonicParanoid => "SonicParanoid",
        }
    }

    /// Short label used in pair names such as `Br_vs_OF`
    pub fn abbreviation(self) -> &'static str {
        match self {
            OrthologyTool::Broccoli => "Br",
            OrthologyTool::OrthoFinder => "OF",
            OrthologyTool::ProteinOrtho => "PO",
            OrthologyTool::SonicParanoid => "SP",
        }
    }

    /// Column header the parsed tables use for this tool's group ids
    pub fn group_column(self) -> String {
        format!("{}_OG", self.name())
    }

    /// Lowercase key used for config sections and checkpoint file names
    pub fn key(self) -> &'static str {
        match self {
            OrthologyTool::Broccoli => "broccoli",
            OrthologyTool::OrthoFinder => "orthofinder",
            OrthologyTool::ProteinOrtho => "proteinortho",
            OrthologyTool::SonicParanoid => "sonicparanoid",
        }
    }
}

impl fmt::Display for OrthologyTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OrthologyTool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "broccoli" | "br" => Ok(OrthologyTool::Broccoli),
            "orthofinder" | "of" => Ok(OrthologyTool::OrthoFinder),
            "proteinortho" | "po" => Ok(OrthologyTool::ProteinOrtho),
            "sonicparanoid" | "sp" => Ok(OrthologyTool::SonicParanoid),
            _ => Err(format!("Unknown clustering tool: {}", s)),
        }
    }
}

/// Unordered pair of distinct tools, stored with `first` before `second`
/// in slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToolPair {
    first: OrthologyTool,
    second: OrthologyTool,
}

impl ToolPair {
    /// Build a pair from two distinct tools in either order
    pub fn new(a: OrthologyTool, b: OrthologyTool) -> Option<Self> {
        if a == b {
            return None;
        }
        let (first, second) = if a.slot() < b.slot() { (a, b) } else { (b, a) };
        Some(Self { first, second })
    }

    pub fn first(&self) -> OrthologyTool {
        self.first
    }

    pub fn second(&self) -> OrthologyTool {
        self.second
    }

    /// All six pairs in canonical order: Br_vs_OF, Br_vs_PO, Br_vs_SP,
    /// OF_vs_PO, OF_vs_SP, PO_vs_SP
    pub fn all() -> Vec<ToolPair> {
        let mut pairs = Vec::with_capacity(6);
        for (i, &first) in OrthologyTool::ALL.iter().enumerate() {
            for &second in &OrthologyTool::ALL[i + 1..] {
                pairs.push(ToolPair { first, second });
            }
        }
        pairs
    }

    /// Tools whose member lists are the left and right sequences when the
    /// pair is scored. OrthoFinder is the right-hand side against
    /// ProteinOrtho and SonicParanoid; every other pair scores in slot order.
    pub fn operands(&self) -> (OrthologyTool, OrthologyTool) {
        match (self.first, self.second) {
            (OrthologyTool::OrthoFinder, other @ OrthologyTool::ProteinOrtho)
            | (OrthologyTool::OrthoFinder, other @ OrthologyTool::SonicParanoid) => {
                (other, OrthologyTool::OrthoFinder)
            }
            (first, second) => (first, second),
        }
    }

    pub fn label(&self) -> String {
        format!("{}_vs_{}", self.first.abbreviation(), self.second.abbreviation())
    }
}

impl fmt::Display for ToolPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for ToolPair {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (a, b) = s
            .split_once("_vs_")
            .ok_or_else(|| format!("Invalid tool pair label: {}", s))?;
        let a: OrthologyTool = a.parse()?;
        let b: OrthologyTool = b.parse()?;
        ToolPair::new(a, b).ok_or_else(|| format!("Tool pair must name two different tools: {}", s))
    }
}

// Pairs are map keys in the checkpoint JSON, so they travel as their label.
impl Serialize for ToolPair {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}

impl<'de> Deserialize<'de> for ToolPair {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_pairs_canonical_order() {
        let labels: Vec<String> = ToolPair::all().iter().map(|p| p.label()).collect();
        assert_eq!(
            labels,
            vec!["Br_vs_OF", "Br_vs_PO", "Br_vs_SP", "OF_vs_PO", "OF_vs_SP", "PO_vs_SP"]
        );
    }

    #[test]
    fn test_pair_is_unordered() {
        let a = ToolPair::new(OrthologyTool::SonicParanoid, OrthologyTool::OrthoFinder).unwrap();
        let b = ToolPair::new(OrthologyTool::OrthoFinder, OrthologyTool::SonicParanoid).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.first(), OrthologyTool::OrthoFinder);
        assert!(ToolPair::new(OrthologyTool::Broccoli, OrthologyTool::Broccoli).is_none());
    }

    #[test]
    fn test_operands_swap_orthofinder_pairs() {
        let operands: Vec<(OrthologyTool, OrthologyTool)> =
            ToolPair::all().iter().map(|p| p.operands()).collect();
        assert_eq!(
            operands,
            vec![
                (OrthologyTool::Broccoli, OrthologyTool::OrthoFinder),
                (OrthologyTool::Broccoli, OrthologyTool::ProteinOrtho),
                (OrthologyTool::Broccoli, OrthologyTool::SonicParanoid),
                (OrthologyTool::ProteinOrtho, OrthologyTool::OrthoFinder),
                (OrthologyTool::SonicParanoid, OrthologyTool::OrthoFinder),
                (OrthologyTool::ProteinOrtho, OrthologyTool::SonicParanoid),
            ]
        );
    }

    #[test]
    fn test_pair_label_parsing() {
        let pair: ToolPair = "PO_vs_OF".parse().unwrap();
        assert_eq!(pair.label(), "OF_vs_PO");
        assert!("Br_vs_Br".parse::<ToolPair>().is_err());
        assert!("Broccoli".parse::<ToolPair>().is_err());
    }

    #[test]
    fn test_pair_serializes_as_label() {
        let pair = ToolPair::new(OrthologyTool::Broccoli, OrthologyTool::ProteinOrtho).unwrap();
        let json = serde_json::to_string(&pair).unwrap();
        assert_eq!(json, "\"Br_vs_PO\"");
        let back: ToolPair = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pair);
    }

    #[test]
    fn test_slots_follow_declaration_order() {
        for (i, tool) in OrthologyTool::ALL.iter().enumerate() {
            assert_eq!(tool.slot(), i);
        }
        assert_eq!(OrthologyTool::ProteinOrtho.group_column(), "ProteinOrtho_OG");
    }
}
