use curated::{Checks, Record, Status, Validate, ValidationReport};
use serde::{Deserialize, Serialize};

/// A cultural-heritage site, the canonical record under edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeritageSite {
    pub id: String,
    pub name: String,
    pub location: String,
    pub year: i64,
    pub status: Status,
}

impl Record for HeritageSite {
    const KIND: &'static str = "heritage_sites";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Validate for HeritageSite {
    fn validate(&self) -> ValidationReport {
        let mut checks = Checks::new();
        checks.require("name", &self.name);
        checks.require("location", &self.location);
        checks.in_range("year", self.year, -3000, 2100);
        checks.finish()
    }
}

pub fn great_wall() -> HeritageSite {
    HeritageSite {
        id: "CH001".to_string(),
        name: "Great Wall".to_string(),
        location: "Huairou".to_string(),
        year: 220,
        status: Status::Active,
    }
}

pub fn ancient_vase() -> HeritageSite {
    HeritageSite {
        id: "CH002".to_string(),
        name: "Ancient Vase".to_string(),
        location: "Athens".to_string(),
        year: -500,
        status: Status::Pending,
    }
}
