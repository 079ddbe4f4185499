//! Archaeological cultures and their ancestry profiles

use serde::{Deserialize, Serialize};

use crate::core::types::{bce_range, LatLng, Year};

/// Ancestry components reported for ancient genomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneticComponent {
    Whg,
    Ehg,
    Chg,
    Eef,
    Steppe,
}

impl GeneticComponent {
    pub const ALL: [GeneticComponent; 5] = [
        GeneticComponent::Whg,
        GeneticComponent::Ehg,
        GeneticComponent::Chg,
        GeneticComponent::Eef,
        GeneticComponent::Steppe,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::Whg => "WHG",
            Self::Ehg => "EHG",
            Self::Chg => "CHG",
            Self::Eef => "EEF",
            Self::Steppe => "Steppe",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Whg => "Western Hunter-Gatherer",
            Self::Ehg => "Eastern Hunter-Gatherer",
            Self::Chg => "Caucasus Hunter-Gatherer",
            Self::Eef => "Early European Farmer",
            Self::Steppe => "Yamnaya-related Steppe",
        }
    }
}

/// Percentage breakdown; components sum informally to about 100
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneticProfile {
    #[serde(rename = "WHG", default, skip_serializing_if = "Option::is_none")]
    pub whg: Option<f32>,
    #[serde(rename = "EHG", default, skip_serializing_if = "Option::is_none")]
    pub ehg: Option<f32>,
    #[serde(rename = "CHG", default, skip_serializing_if = "Option::is_none")]
    pub chg: Option<f32>,
    #[serde(rename = "EEF", default, skip_serializing_if = "Option::is_none")]
    pub eef: Option<f32>,
    #[serde(rename = "Steppe", default, skip_serializing_if = "Option::is_none")]
    pub steppe: Option<f32>,
}

impl GeneticProfile {
    pub fn get(&self, component: GeneticComponent) -> Option<f32> {
        match component {
            GeneticComponent::Whg => self.whg,
            GeneticComponent::Ehg => self.ehg,
            GeneticComponent::Chg => self.chg,
            GeneticComponent::Eef => self.eef,
            GeneticComponent::Steppe => self.steppe,
        }
    }

    /// Present components, largest share first
    pub fn components(&self) -> Vec<(GeneticComponent, f32)> {
        let mut parts: Vec<_> = GeneticComponent::ALL
            .iter()
            .filter_map(|c| self.get(*c).map(|v| (*c, v)))
            .collect();
        parts.sort_by(|a, b| b.1.total_cmp(&a.1));
        parts
    }

    pub fn total(&self) -> f32 {
        self.components().iter().map(|(_, v)| v).sum()
    }
}

/// A culture with a lifetime, a centre and an optional territory polygon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Culture {
    pub id: String,
    pub name: String,
    pub start: Year,
    pub end: Year,
    pub center: LatLng,
    pub region: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genetic_profile: Option<GeneticProfile>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub innovations: Vec<String>,
    pub color: String,
}

impl Culture {
    /// Name without the parenthesised qualifier, for map labels
    pub fn short_name(&self) -> &str {
        self.name.split('(').next().unwrap_or(&self.name).trim()
    }

    pub fn date_range_label(&self) -> String {
        bce_range(self.start, self.end)
    }

    pub fn span(&self) -> Year {
        self.end - self.start
    }
}
