//! Column resolution: picking exactly one data column from the seven
//! dropdown selections.

use immigration_map_catalog::{ALL_IMMIGRANTS_COLUMN, DataType};
use immigration_map_dataset_models::Selection;

/// The resolver's output: one column and the map title to show for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumn {
    /// The data column to color the map by.
    pub column: String,
    /// Display title for the map.
    pub title: String,
}

/// Resolves the current selection to exactly one data column.
///
/// Precedence, first match wins:
/// 1. a data type other than "Immigrant number" (overrides everything,
///    including an active country or region filter — deliberate UX
///    behavior, kept as-is);
/// 2. a selected origin country;
/// 3. a selected composite indicator;
/// 4. an origin region other than the all-immigrants sentinel;
/// 5. a selected accessibility mode;
/// 6. the selected period.
///
/// Among the immigration-count views (2-6) the most specific active
/// filter wins. The output never depends on column contents.
#[must_use]
pub fn resolve_column(selection: &Selection) -> ResolvedColumn {
    if selection.data_type != DataType::ImmigrantNumber {
        // column() is Some for every non-default data type.
        let column = selection.data_type.column().unwrap_or(ALL_IMMIGRANTS_COLUMN);
        return ResolvedColumn {
            column: column.to_string(),
            title: format!("{} by ADA", selection.data_type),
        };
    }

    let column = if let Some(country) = &selection.country {
        country.clone()
    } else if let Some(indicator) = &selection.indicator {
        indicator.clone()
    } else if selection.region != ALL_IMMIGRANTS_COLUMN {
        selection.region.clone()
    } else if let Some(accessibility) = &selection.accessibility {
        accessibility.clone()
    } else {
        selection.period.clone()
    };

    ResolvedColumn {
        title: format!("Immigration by {column}"),
        column,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection() -> Selection {
        Selection::default()
    }

    #[test]
    fn default_selection_resolves_to_period() {
        let resolved = resolve_column(&selection());
        assert_eq!(resolved.column, "T1529");
        assert_eq!(resolved.title, "Immigration by T1529");
    }

    #[test]
    fn data_type_overrides_every_other_control() {
        let mut s = selection();
        s.data_type = DataType::Quintile;
        s.country = Some("T1592".to_string());
        s.indicator = Some("IDI_ADA".to_string());
        s.region = "T1585".to_string();
        s.accessibility = Some("Walking_Accessibility".to_string());

        let resolved = resolve_column(&s);
        assert_eq!(resolved.column, "Average Quintile");
        assert_eq!(resolved.title, "Quintile by ADA");
    }

    #[test]
    fn country_overrides_region_indicator_and_accessibility() {
        let mut s = selection();
        s.country = Some("T1592".to_string());
        s.indicator = Some("IDI_ADA".to_string());
        s.region = "T1585".to_string();
        s.accessibility = Some("Transit_Accessibility".to_string());

        assert_eq!(resolve_column(&s).column, "T1592");
    }

    #[test]
    fn indicator_overrides_region_and_accessibility() {
        let mut s = selection();
        s.indicator = Some("ESAI-Norm".to_string());
        s.region = "T1585".to_string();
        s.accessibility = Some("Transit_Accessibility".to_string());

        assert_eq!(resolve_column(&s).column, "ESAI-Norm");
    }

    #[test]
    fn non_default_region_overrides_accessibility_and_period() {
        let mut s = selection();
        s.region = "T1574".to_string();
        s.accessibility = Some("Transit_Accessibility".to_string());
        s.period = "T1534".to_string();

        assert_eq!(resolve_column(&s).column, "T1574");
    }

    #[test]
    fn accessibility_overrides_period() {
        let mut s = selection();
        s.accessibility = Some("Walking_Accessibility".to_string());
        s.period = "T1534".to_string();

        assert_eq!(resolve_column(&s).column, "Walking_Accessibility");
    }

    #[test]
    fn sentinel_region_falls_through_to_period() {
        let mut s = selection();
        s.period = "T1531".to_string();

        let resolved = resolve_column(&s);
        assert_eq!(resolved.column, "T1531");
        assert_eq!(resolved.title, "Immigration by T1531");
    }

    #[test]
    fn count_view_titles_name_the_column() {
        let mut s = selection();
        s.country = Some("T1599".to_string());
        assert_eq!(resolve_column(&s).title, "Immigration by T1599");
    }
}
