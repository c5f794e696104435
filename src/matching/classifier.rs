// Ranked category classifier.
//
// A document is assigned exactly one label. Base categories (PDE, SDE,
// Sensor, ...) are presence-tested with first-match semantics, then an
// explicit ranked list of rules is evaluated top to bottom; the first rule
// whose required bases are all present decides the label. When no rule
// fires, the fallback label applies.
//
// Because rules are ranked, "requires [Pde]" listed after
// "requires [Pde, Sde]" effectively means "PDE only". Adding a base category
// changes the rule list, never the algorithm.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::matcher::Matcher;
use crate::keywords::list::KeywordList;

/// One ranked rule: `label` applies when every base in `requires` is present.
#[derive(Debug, Clone)]
pub struct Rule<B, L> {
    pub label: L,
    pub requires: Vec<B>,
}

/// Mutually-exclusive classifier over a fixed set of base categories.
#[derive(Debug, Clone)]
pub struct RankedClassifier<B, L> {
    bases: Vec<(B, Matcher)>,
    rules: Vec<Rule<B, L>>,
    fallback: L,
}

impl<B, L> RankedClassifier<B, L>
where
    B: Copy + PartialEq + std::fmt::Debug,
    L: Copy,
{
    pub fn new(bases: Vec<(B, Matcher)>, rules: Vec<Rule<B, L>>, fallback: L) -> Result<Self> {
        for rule in &rules {
            if rule.requires.is_empty() {
                anyhow::bail!("Classifier rule with no required bases would shadow every later rule");
            }
            if let Some(unknown) = rule
                .requires
                .iter()
                .find(|b| !bases.iter().any(|(base, _)| base == *b))
            {
                anyhow::bail!("Classifier rule requires unknown base category {unknown:?}");
            }
        }
        Ok(Self {
            bases,
            rules,
            fallback,
        })
    }

    /// Base categories present in the text.
    pub fn present(&self, text: &str) -> Vec<B> {
        self.bases
            .iter()
            .filter(|(_, matcher)| matcher.first_match_exists(text))
            .map(|(base, _)| *base)
            .collect()
    }

    /// The label of the first rule satisfied by the text.
    pub fn classify(&self, text: &str) -> L {
        let present = self.present(text);
        self.rules
            .iter()
            .find(|rule| rule.requires.iter().all(|b| present.contains(b)))
            .map(|rule| rule.label)
            .unwrap_or(self.fallback)
    }

    /// Every label this classifier can produce, in rank order, fallback last.
    pub fn labels(&self) -> Vec<L> {
        self.rules
            .iter()
            .map(|rule| rule.label)
            .chain(std::iter::once(self.fallback))
            .collect()
    }
}

/// Base equation families searched for in a paper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseCategory {
    Pde,
    Sde,
    Sensor,
}

impl BaseCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            BaseCategory::Pde => "PDE",
            BaseCategory::Sde => "SDE",
            BaseCategory::Sensor => "Sensor",
        }
    }
}

/// The single category assigned to each paper by the equations run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EquationCategory {
    #[serde(rename = "Both PDE and SDE")]
    Both,
    #[serde(rename = "PDE-only")]
    PdeOnly,
    #[serde(rename = "SDE-only")]
    SdeOnly,
    #[serde(rename = "Sensor-only")]
    SensorOnly,
    Neither,
}

impl EquationCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            EquationCategory::Both => "Both PDE and SDE",
            EquationCategory::PdeOnly => "PDE-only",
            EquationCategory::SdeOnly => "SDE-only",
            EquationCategory::SensorOnly => "Sensor-only",
            EquationCategory::Neither => "Neither",
        }
    }
}

impl std::fmt::Display for EquationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type EquationClassifier = RankedClassifier<BaseCategory, EquationCategory>;

/// Both > PDE-only > SDE-only > Neither.
pub fn two_way(pde: &KeywordList, sde: &KeywordList) -> Result<EquationClassifier> {
    RankedClassifier::new(
        vec![
            (BaseCategory::Pde, Matcher::bounded(pde)?),
            (BaseCategory::Sde, Matcher::bounded(sde)?),
        ],
        equation_rules(false),
        EquationCategory::Neither,
    )
}

/// Both > PDE-only > SDE-only > Sensor-only > Neither.
///
/// Sensor ranks below PDE and SDE, so a paper with PDE and sensor keywords
/// is still "PDE-only".
pub fn three_way(
    pde: &KeywordList,
    sde: &KeywordList,
    sensor: &KeywordList,
) -> Result<EquationClassifier> {
    RankedClassifier::new(
        vec![
            (BaseCategory::Pde, Matcher::bounded(pde)?),
            (BaseCategory::Sde, Matcher::bounded(sde)?),
            (BaseCategory::Sensor, Matcher::bounded(sensor)?),
        ],
        equation_rules(true),
        EquationCategory::Neither,
    )
}

fn equation_rules(with_sensor: bool) -> Vec<Rule<BaseCategory, EquationCategory>> {
    let mut rules = vec![
        Rule {
            label: EquationCategory::Both,
            requires: vec![BaseCategory::Pde, BaseCategory::Sde],
        },
        Rule {
            label: EquationCategory::PdeOnly,
            requires: vec![BaseCategory::Pde],
        },
        Rule {
            label: EquationCategory::SdeOnly,
            requires: vec![BaseCategory::Sde],
        },
    ];
    if with_sensor {
        rules.push(Rule {
            label: EquationCategory::SensorOnly,
            requires: vec![BaseCategory::Sensor],
        });
    }
    rules
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lists() -> (KeywordList, KeywordList, KeywordList) {
        (
            KeywordList::from_strs("pde_categories", &["heat equation", "advection"]).unwrap(),
            KeywordList::from_strs("sde_categories", &["brownian motion", "Ito"]).unwrap(),
            KeywordList::from_strs("sensor_categories", &["lidar", "thermal camera"]).unwrap(),
        )
    }

    #[test]
    fn test_two_way_precedence() {
        let (pde, sde, _) = lists();
        let c = two_way(&pde, &sde).unwrap();
        assert_eq!(c.classify("heat equation with brownian motion"), EquationCategory::Both);
        assert_eq!(c.classify("an advection scheme"), EquationCategory::PdeOnly);
        assert_eq!(c.classify("Ito calculus"), EquationCategory::SdeOnly);
        assert_eq!(c.classify("field notes"), EquationCategory::Neither);
    }

    #[test]
    fn test_three_way_sensor_ranks_below_pde() {
        let (pde, sde, sensor) = lists();
        let c = three_way(&pde, &sde, &sensor).unwrap();
        assert_eq!(c.classify("lidar survey"), EquationCategory::SensorOnly);
        assert_eq!(c.classify("lidar and the heat equation"), EquationCategory::PdeOnly);
        assert_eq!(c.classify("lidar with Ito noise"), EquationCategory::SdeOnly);
    }

    #[test]
    fn test_empty_text_is_fallback() {
        let (pde, sde, sensor) = lists();
        let c = three_way(&pde, &sde, &sensor).unwrap();
        assert_eq!(c.classify(""), EquationCategory::Neither);
    }

    #[test]
    fn test_labels_in_rank_order() {
        let (pde, sde, _) = lists();
        let c = two_way(&pde, &sde).unwrap();
        assert_eq!(
            c.labels(),
            vec![
                EquationCategory::Both,
                EquationCategory::PdeOnly,
                EquationCategory::SdeOnly,
                EquationCategory::Neither,
            ]
        );
    }

    #[test]
    fn test_rejects_rule_with_no_requirements() {
        let (pde, _, _) = lists();
        let result = RankedClassifier::new(
            vec![(BaseCategory::Pde, Matcher::bounded(&pde).unwrap())],
            vec![Rule {
                label: EquationCategory::PdeOnly,
                requires: vec![],
            }],
            EquationCategory::Neither,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_rule_on_unknown_base() {
        let (pde, _, _) = lists();
        let result = RankedClassifier::new(
            vec![(BaseCategory::Pde, Matcher::bounded(&pde).unwrap())],
            vec![Rule {
                label: EquationCategory::SdeOnly,
                requires: vec![BaseCategory::Sde],
            }],
            EquationCategory::Neither,
        );
        assert!(result.is_err());
    }
}
