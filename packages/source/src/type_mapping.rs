//! Crime type mapping utilities.
//!
//! Maps the feed's fine-grained `StatisticGroup` labels to the six coarse
//! [`Category`] values. Matching is exact: labels outside the fixed table
//! map to nothing and the caller drops the record.

use crime_dashboard_crime_models::Category;

/// Maps a raw statistic-group label to its [`Category`].
///
/// Returns `None` when the label belongs to no category.
#[must_use]
pub fn categorize(label: &str) -> Option<Category> {
    Category::all()
        .iter()
        .copied()
        .find(|category| category.statistic_groups().contains(&label))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_every_table_label() {
        assert_eq!(categorize("עבירות כלפי הרכוש"), Some(Category::GeneralCriminal));
        assert_eq!(categorize("עבירות נגד גוף"), Some(Category::GeneralCriminal));
        assert_eq!(categorize("עבירות נגד אדם"), Some(Category::GeneralCriminal));
        assert_eq!(categorize("עבירות מין"), Some(Category::GeneralCriminal));
        assert_eq!(categorize("עבירות כלפי המוסר"), Some(Category::MoralityPublicOrder));
        assert_eq!(categorize("עבירות סדר ציבורי"), Some(Category::MoralityPublicOrder));
        assert_eq!(categorize("עבירות בטחון"), Some(Category::Security));
        assert_eq!(categorize("עבירות כלכליות"), Some(Category::EconomicAdministrative));
        assert_eq!(categorize("עבירות מנהליות"), Some(Category::EconomicAdministrative));
        assert_eq!(categorize("עבירות רשוי"), Some(Category::EconomicAdministrative));
        assert_eq!(categorize("עבירות תנועה"), Some(Category::Traffic));
        assert_eq!(categorize("עבירות מרמה"), Some(Category::Fraud));
    }

    #[test]
    fn table_and_mapper_agree() {
        for category in Category::all() {
            for label in category.statistic_groups() {
                assert_eq!(categorize(label), Some(*category), "{label}");
            }
        }
    }

    #[test]
    fn unmapped_labels_return_none() {
        assert_eq!(categorize("שאר עבירות"), None);
        assert_eq!(categorize(""), None);
        // Coarse labels are not fine labels.
        assert_eq!(categorize("עבירות ביטחון"), None);
        assert_eq!(categorize(" עבירות תנועה"), None);
    }
}
