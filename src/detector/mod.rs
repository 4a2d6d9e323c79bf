use crate::types::{DetectionPolicy, ObservationRecord, PriceEvent};

/// Classifies a fresh observation against the history context queried for
/// the configured policy. Pure: the caller runs the matching store query
/// (`latest` for [`DetectionPolicy::Latest`], `extreme_max` for
/// [`DetectionPolicy::Maximum`]) and persists afterwards.
pub fn detect(
    policy: DetectionPolicy,
    current: &ObservationRecord,
    context: Option<&ObservationRecord>,
) -> PriceEvent {
    match policy {
        DetectionPolicy::Latest => detect_against_latest(current, context),
        DetectionPolicy::Maximum => detect_against_maximum(current, context),
    }
}

/// Delta vs. latest: equal prices are `Unchanged` (no notification).
pub fn detect_against_latest(
    current: &ObservationRecord,
    latest: Option<&ObservationRecord>,
) -> PriceEvent {
    let Some(previous) = latest else {
        return PriceEvent::FirstSeen {
            price: current.new_price,
        };
    };

    if current.new_price > previous.new_price {
        PriceEvent::Increased {
            price: current.new_price,
            previous_price: previous.new_price,
            previous_at: previous.captured_at,
        }
    } else if current.new_price < previous.new_price {
        PriceEvent::Decreased {
            price: current.new_price,
            previous_price: previous.new_price,
            previous_at: previous.captured_at,
        }
    } else {
        PriceEvent::Unchanged
    }
}

/// Delta vs. running maximum: only a strictly greater price is a new
/// maximum. Matching the recorded high falls to `BelowMaximum`.
pub fn detect_against_maximum(
    current: &ObservationRecord,
    maximum: Option<&ObservationRecord>,
) -> PriceEvent {
    match maximum {
        None => PriceEvent::NewMaximum {
            price: current.new_price,
        },
        Some(max) if current.new_price > max.new_price => PriceEvent::NewMaximum {
            price: current.new_price,
        },
        Some(max) => PriceEvent::BelowMaximum {
            current_price: current.new_price,
            max_price: max.new_price,
            max_at: max.captured_at,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(price: i64, minute: u32) -> ObservationRecord {
        ObservationRecord {
            product_name: "Produto X".to_string(),
            old_price: price + 100,
            new_price: price,
            installment_price: price / 10,
            captured_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, minute, 0).unwrap(),
        }
    }

    #[test]
    fn no_history_is_first_seen() {
        let current = record(500, 0);
        assert_eq!(
            detect_against_latest(&current, None),
            PriceEvent::FirstSeen { price: 500 }
        );
    }

    #[test]
    fn strictly_increasing_sequence_yields_increased_after_first() {
        let prices = [100, 150, 200, 350];
        let mut previous: Option<ObservationRecord> = None;
        let mut first_seen = 0;

        for (i, price) in prices.iter().enumerate() {
            let current = record(*price, i as u32);
            match detect_against_latest(&current, previous.as_ref()) {
                PriceEvent::FirstSeen { .. } => first_seen += 1,
                PriceEvent::Increased {
                    price,
                    previous_price,
                    ..
                } => {
                    assert_eq!(price, current.new_price);
                    assert!(previous_price < price);
                }
                other => panic!("unexpected event {other:?}"),
            }
            previous = Some(current);
        }

        assert_eq!(first_seen, 1);
    }

    #[test]
    fn drop_yields_decreased_with_prior_context() {
        let previous = record(500, 0);
        let current = record(450, 1);
        assert_eq!(
            detect_against_latest(&current, Some(&previous)),
            PriceEvent::Decreased {
                price: 450,
                previous_price: 500,
                previous_at: previous.captured_at,
            }
        );
    }

    #[test]
    fn repeated_price_is_unchanged_under_latest_policy() {
        let previous = record(300, 0);
        let current = record(300, 1);
        assert_eq!(
            detect_against_latest(&current, Some(&previous)),
            PriceEvent::Unchanged
        );
    }

    #[test]
    fn no_history_is_new_maximum() {
        let current = record(500, 0);
        assert_eq!(
            detect_against_maximum(&current, None),
            PriceEvent::NewMaximum { price: 500 }
        );
    }

    #[test]
    fn price_above_recorded_high_is_new_maximum() {
        let max = record(500, 0);
        let current = record(620, 1);
        assert_eq!(
            detect_against_maximum(&current, Some(&max)),
            PriceEvent::NewMaximum { price: 620 }
        );
    }

    #[test]
    fn repeated_price_equal_to_maximum_is_below_maximum() {
        // Equality is not a new maximum; there is no equality branch here.
        let max = record(500, 0);
        let current = record(500, 1);
        assert_eq!(
            detect_against_maximum(&current, Some(&max)),
            PriceEvent::BelowMaximum {
                current_price: 500,
                max_price: 500,
                max_at: max.captured_at,
            }
        );
    }

    #[test]
    fn detect_dispatches_on_policy() {
        let previous = record(500, 0);
        let current = record(500, 1);
        assert_eq!(
            detect(DetectionPolicy::Latest, &current, Some(&previous)),
            PriceEvent::Unchanged
        );
        assert!(matches!(
            detect(DetectionPolicy::Maximum, &current, Some(&previous)),
            PriceEvent::BelowMaximum { .. }
        ));
    }
}
