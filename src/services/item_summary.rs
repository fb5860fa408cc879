use crate::{
    entities::{item, item_action},
    errors::ServiceError,
    repositories::ItemActionStore,
};
use chrono::{Local, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};
use utoipa::ToSchema;

/// Aggregate of the actions created today
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({ "dailyProfit": "130", "soldCount": 8, "insertedCount": 0 }))]
pub struct ItemSummary {
    /// Sum of `(item cost - action price) * quantity`
    #[schema(value_type = String)]
    pub daily_profit: Decimal,
    pub sold_count: i64,
    pub inserted_count: i64,
}

/// `[start of the day containing now, now)`
pub fn daily_window(now: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
    let start = now.date().and_hms_opt(0, 0, 0).unwrap_or(now);
    (start, now)
}

/// Folds actions into a summary. An action without its item counts with zero cost.
pub fn summarize<'a, I>(actions: I) -> ItemSummary
where
    I: IntoIterator<Item = (&'a item_action::Model, Option<&'a item::Model>)>,
{
    actions
        .into_iter()
        .fold(ItemSummary::default(), |mut summary, (action, item)| {
            let cost = item.map(|i| i.cost).unwrap_or(Decimal::ZERO);

            if action.quantity > 0 {
                summary.inserted_count = summary.inserted_count.saturating_add(action.quantity);
            } else if action.quantity < 0 {
                summary.sold_count = summary
                    .sold_count
                    .saturating_add(action.quantity.saturating_neg());
            }

            let margin = cost.saturating_sub(action.price);
            summary.daily_profit = summary
                .daily_profit
                .saturating_add(margin.saturating_mul(Decimal::from(action.quantity)));
            summary
        })
}

/// Read-only daily aggregation over item actions
#[derive(Clone)]
pub struct ItemSummaryService {
    actions: Arc<dyn ItemActionStore>,
}

impl ItemSummaryService {
    pub fn new(actions: Arc<dyn ItemActionStore>) -> Self {
        Self { actions }
    }

    pub async fn get_summary(&self) -> Result<ItemSummary, ServiceError> {
        self.summary_at(Local::now().naive_local()).await
    }

    #[instrument(skip(self))]
    pub async fn summary_at(&self, now: NaiveDateTime) -> Result<ItemSummary, ServiceError> {
        let (start, end) = daily_window(now);
        let rows = self.actions.find_created_between(start, end).await?;

        let summary = summarize(rows.iter().map(|(action, item)| (action, item.as_ref())));
        debug!(
            actions = rows.len(),
            sold = summary.sold_count,
            inserted = summary.inserted_count,
            "Computed daily summary"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::item_action_repository::MockItemActionStore;
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 17)
            .and_then(|d| d.and_hms_opt(h, m, 0))
            .unwrap()
    }

    fn item_costing(id: i64, cost: Decimal) -> item::Model {
        item::Model {
            id,
            code: format!("IMS-{}", id),
            name: "IMS-Item".to_string(),
            cost,
            price: Decimal::ZERO,
            quantity: 0,
        }
    }

    fn action(id: i64, price: Decimal, quantity: i64) -> item_action::Model {
        item_action::Model {
            id,
            price,
            quantity,
            created_date: at(10, 0),
            last_modified_date: at(10, 0),
            item_id: 1,
        }
    }

    fn fold(rows: &[(item_action::Model, Option<item::Model>)]) -> ItemSummary {
        summarize(rows.iter().map(|(a, i)| (a, i.as_ref())))
    }

    #[test]
    fn window_starts_at_local_midnight() {
        let (start, end) = daily_window(at(15, 42));
        assert_eq!(start, at(0, 0));
        assert_eq!(end, at(15, 42));
    }

    #[test]
    fn empty_day_is_all_zeros() {
        assert_eq!(fold(&[]), ItemSummary::default());
    }

    #[rstest]
    // two insertions: 10 @ 100 cost 80 and 5 @ 50 cost 40
    #[case(vec![(dec!(100), 10, dec!(80)), (dec!(50), 5, dec!(40))], dec!(-250), 0, 15)]
    // two sales: -5 @ 100 cost 80 and -3 @ 50 cost 40
    #[case(vec![(dec!(100), -5, dec!(80)), (dec!(50), -3, dec!(40))], dec!(130), 8, 0)]
    // insertion then sale of the same item
    #[case(vec![(dec!(100), 10, dec!(80)), (dec!(100), -5, dec!(80))], dec!(-100), 5, 10)]
    // two sales of an item costing 100: -5 @ 80 and -3 @ 40
    #[case(vec![(dec!(80), -5, dec!(100)), (dec!(40), -3, dec!(100))], dec!(-280), 8, 0)]
    // selling below cost
    #[case(vec![(dec!(80), -5, dec!(100))], dec!(-100), 5, 0)]
    // zero quantity counts nowhere
    #[case(vec![(dec!(80), 0, dec!(100))], dec!(0), 0, 0)]
    fn folds_actions(
        #[case] rows: Vec<(Decimal, i64, Decimal)>,
        #[case] profit: Decimal,
        #[case] sold: i64,
        #[case] inserted: i64,
    ) {
        let rows: Vec<_> = rows
            .into_iter()
            .enumerate()
            .map(|(i, (price, quantity, cost))| {
                let id = i as i64 + 1;
                (action(id, price, quantity), Some(item_costing(id, cost)))
            })
            .collect();

        let summary = fold(&rows);
        assert_eq!(summary.daily_profit, profit);
        assert_eq!(summary.sold_count, sold);
        assert_eq!(summary.inserted_count, inserted);
    }

    #[test]
    fn missing_item_counts_with_zero_cost() {
        let rows = vec![(action(1, dec!(20), -2), None)];
        let summary = fold(&rows);
        assert_eq!(summary.daily_profit, dec!(40));
        assert_eq!(summary.sold_count, 2);
    }

    #[tokio::test]
    async fn summary_queries_todays_window() {
        let mut actions = MockItemActionStore::new();
        actions
            .expect_find_created_between()
            .withf(|start, end| *start == at(0, 0) && *end == at(18, 5))
            .times(1)
            .returning(|_, _| {
                Ok(vec![(
                    action(1, dec!(100), -5),
                    Some(item_costing(1, dec!(80))),
                )])
            });

        let summary = ItemSummaryService::new(Arc::new(actions))
            .summary_at(at(18, 5))
            .await
            .unwrap();
        assert_eq!(summary.daily_profit, dec!(100));
        assert_eq!(summary.sold_count, 5);
        assert_eq!(summary.inserted_count, 0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn counts_split_by_sign(quantities in proptest::collection::vec(-1_000i64..1_000, 0..32)) {
            let rows: Vec<_> = quantities
                .iter()
                .enumerate()
                .map(|(i, q)| (action(i as i64 + 1, dec!(3), *q), Some(item_costing(1, dec!(2)))))
                .collect();

            let summary = fold(&rows);
            let inserted: i64 = quantities.iter().filter(|q| **q > 0).sum();
            let sold: i64 = quantities.iter().filter(|q| **q < 0).map(|q| -q).sum();
            let net: i64 = quantities.iter().sum();

            prop_assert_eq!(summary.inserted_count, inserted);
            prop_assert_eq!(summary.sold_count, sold);
            // cost 2, price 3: each unit moves profit by -1
            prop_assert_eq!(summary.daily_profit, Decimal::from(-net));
        }
    }
}
