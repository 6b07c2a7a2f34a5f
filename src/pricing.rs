//! Class cost calculation.
//!
//! Four pricing models: per-person, flat per-class, per-hour and tiered.
//! Missing fields or a missing model degrade to 0 instead of erroring, so a
//! half-configured class never breaks a listing. All amounts are cents.

use crate::models::{Class, PricingModel};

/// Total cost of one class session given the current enrollment.
///
/// Never negative, never errors.
pub fn class_cost(class: &Class, enrolled_count: i64) -> i64 {
    let cost = match class.pricing_model {
        Some(PricingModel::PerPerson) => enrolled_count * class.cost_per_person.unwrap_or(0),
        Some(PricingModel::PerClass) => class.base_cost.unwrap_or(0),
        Some(PricingModel::PerHour) => {
            per_hour_cost(class.duration_minutes(), class.cost_per_hour.unwrap_or(0))
        }
        Some(PricingModel::Tiered) => {
            let base = class.base_cost.unwrap_or(0);
            let included = class.tiered_base_students.unwrap_or(0);
            let extra = (enrolled_count - included).max(0);
            base + extra * class.tiered_additional_cost.unwrap_or(0)
        }
        None => 0,
    };
    cost.max(0)
}

// Multiply before dividing so minute-granularity durations stay exact
// (90 min at 4000/h is 6000, not 5940).
fn per_hour_cost(duration_minutes: i64, cost_per_hour: i64) -> i64 {
    duration_minutes.max(0) * cost_per_hour / 60
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn base_class() -> Class {
        let start = Utc.with_ymd_and_hms(2025, 9, 1, 18, 0, 0).unwrap();
        Class {
            id: 1,
            studio_id: 1,
            instructor_id: 1,
            title: "Test".to_string(),
            description: None,
            location: None,
            start_time: start,
            end_time: start + Duration::hours(1),
            capacity: None,
            pricing_model: None,
            cost_per_person: None,
            base_cost: None,
            cost_per_hour: None,
            tiered_base_students: None,
            tiered_additional_cost: None,
            canceled: false,
            created_at: start,
            updated_at: start,
        }
    }

    #[test]
    fn test_per_person() {
        let mut class = base_class();
        class.pricing_model = Some(PricingModel::PerPerson);
        class.cost_per_person = Some(2500);
        assert_eq!(class_cost(&class, 4), 10000);
        assert_eq!(class_cost(&class, 0), 0);
    }

    #[test]
    fn test_per_person_unset_rate_is_zero() {
        let mut class = base_class();
        class.pricing_model = Some(PricingModel::PerPerson);
        assert_eq!(class_cost(&class, 10), 0);
    }

    #[test]
    fn test_per_class_flat_ignores_enrollment() {
        let mut class = base_class();
        class.pricing_model = Some(PricingModel::PerClass);
        class.base_cost = Some(8000);
        assert_eq!(class_cost(&class, 0), 8000);
        assert_eq!(class_cost(&class, 25), 8000);
    }

    #[test]
    fn test_per_hour_fractional_duration() {
        let mut class = base_class();
        class.pricing_model = Some(PricingModel::PerHour);
        class.cost_per_hour = Some(4000);
        class.end_time = class.start_time + Duration::minutes(90);
        // 1.5 h at $40/h is exactly $60
        assert_eq!(class_cost(&class, 3), 6000);
    }

    #[test]
    fn test_per_hour_negative_duration_clamps_to_zero() {
        let mut class = base_class();
        class.pricing_model = Some(PricingModel::PerHour);
        class.cost_per_hour = Some(4000);
        class.end_time = class.start_time - Duration::hours(1);
        assert_eq!(class_cost(&class, 3), 0);
    }

    #[test]
    fn test_tiered() {
        let mut class = base_class();
        class.pricing_model = Some(PricingModel::Tiered);
        class.base_cost = Some(5000);
        class.tiered_base_students = Some(3);
        class.tiered_additional_cost = Some(1000);
        // 50 + 2 * 10 = 70
        assert_eq!(class_cost(&class, 5), 7000);
    }

    #[test]
    fn test_tiered_under_base_count_charges_base_only() {
        let mut class = base_class();
        class.pricing_model = Some(PricingModel::Tiered);
        class.base_cost = Some(5000);
        class.tiered_base_students = Some(3);
        class.tiered_additional_cost = Some(1000);
        assert_eq!(class_cost(&class, 2), 5000);
        assert_eq!(class_cost(&class, 3), 5000);
    }

    #[test]
    fn test_missing_model_is_zero() {
        let class = base_class();
        assert_eq!(class_cost(&class, 12), 0);
    }

    #[test]
    fn test_never_negative() {
        let mut class = base_class();
        class.pricing_model = Some(PricingModel::Tiered);
        class.base_cost = Some(-5000);
        class.tiered_base_students = Some(0);
        class.tiered_additional_cost = Some(0);
        assert_eq!(class_cost(&class, 1), 0);
    }
}
