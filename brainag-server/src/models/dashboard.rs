//! Dashboard aggregates

use serde::Serialize;
use uuid::Uuid;

use super::validation::non_blank;
use super::Criteria;

/// Optional dashboard scope
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardFilter {
    pub producer_id: Option<Uuid>,
    pub state: Option<String>,
    pub crop_name: Option<String>,
}

impl DashboardFilter {
    pub fn new(producer_id: Option<Uuid>, state: Option<&str>, crop_name: Option<&str>) -> Self {
        Self {
            producer_id,
            state: non_blank(state),
            crop_name: non_blank(crop_name),
        }
    }

    /// Farms counted by the dashboard.
    pub fn farm_scope(&self) -> Criteria {
        Criteria::new()
            .equals_opt("producer_id", self.producer_id)
            .equals_opt("state", self.state.as_deref())
    }

    /// Crops counted by the dashboard.
    ///
    /// `producer_farms` is the producer's farm ids, resolved beforehand when
    /// a producer is in scope. An empty set matches no crops.
    pub fn crop_scope(&self, producer_farms: Option<Vec<Uuid>>) -> Criteria {
        let criteria = Criteria::new().equals_opt("name", self.crop_name.as_deref());
        match producer_farms {
            Some(ids) => criteria.one_of("farm_id", ids),
            None => criteria,
        }
    }
}

/// Area sums over a farm scope; zero when nothing matches
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AreaTotals {
    pub total: f64,
    pub arable: f64,
    pub vegetation: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateCount {
    pub state: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CropCount {
    pub name: String,
    pub count: i64,
}

/// Land-use bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LandUse {
    Arable,
    Vegetation,
}

impl LandUse {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Arable => "Área Agricultável",
            Self::Vegetation => "Área de Vegetação",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LandUseSlice {
    pub key: LandUse,
    pub label: &'static str,
    pub value: f64,
}

impl LandUseSlice {
    fn new(key: LandUse, value: f64) -> Self {
        Self {
            key,
            label: key.label(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_farms: i64,
    pub total_hectares: f64,
    pub farms_by_state: Vec<StateCount>,
    pub crops_distribution: Vec<CropCount>,
    pub land_use_distribution: Vec<LandUseSlice>,
}

impl DashboardSummary {
    /// Assemble the summary; groups are sorted by key.
    pub fn new(
        total_farms: i64,
        areas: AreaTotals,
        mut farms_by_state: Vec<StateCount>,
        mut crops_distribution: Vec<CropCount>,
    ) -> Self {
        farms_by_state.sort_by(|a, b| a.state.cmp(&b.state));
        crops_distribution.sort_by(|a, b| a.name.cmp(&b.name));

        Self {
            total_farms,
            total_hectares: areas.total,
            farms_by_state,
            crops_distribution,
            land_use_distribution: vec![
                LandUseSlice::new(LandUse::Arable, areas.arable),
                LandUseSlice::new(LandUse::Vegetation, areas.vegetation),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_summary_shape() {
        let summary = DashboardSummary::new(0, AreaTotals::default(), vec![], vec![]);
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(
            value,
            json!({
                "totalFarms": 0,
                "totalHectares": 0.0,
                "farmsByState": [],
                "cropsDistribution": [],
                "landUseDistribution": [
                    {"key": "arable", "label": "Área Agricultável", "value": 0.0},
                    {"key": "vegetation", "label": "Área de Vegetação", "value": 0.0}
                ]
            })
        );
    }

    #[test]
    fn groups_sorted_by_key() {
        let summary = DashboardSummary::new(
            3,
            AreaTotals::default(),
            vec![
                StateCount { state: "SP".into(), count: 1 },
                StateCount { state: "MG".into(), count: 2 },
            ],
            vec![
                CropCount { name: "Soja".into(), count: 1 },
                CropCount { name: "Café".into(), count: 1 },
            ],
        );
        assert_eq!(summary.farms_by_state[0].state, "MG");
        assert_eq!(summary.crops_distribution[0].name, "Café");
    }

    #[test]
    fn crop_scope_with_empty_farm_set_is_restrictive() {
        let filter = DashboardFilter::new(Some(Uuid::new_v4()), None, Some("Soja"));
        let scope = filter.crop_scope(Some(vec![]));
        assert_eq!(scope.predicates().len(), 2);

        let filter = DashboardFilter::new(None, Some(" "), None);
        assert!(filter.farm_scope().is_empty());
        assert!(filter.crop_scope(None).is_empty());
    }
}
