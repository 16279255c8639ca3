use core_types::{normalize_store_code, StoreAggregate, TransactionRecord};
use std::collections::BTreeMap;

/// Groups transaction records by store and sums quantity, revenue and cost.
///
/// One aggregate per distinct store code, in store-code order. A store with no
/// record in `records` does not appear. Records without a purchase cost add
/// nothing to the cost and are counted in `unpriced_lines`.
pub fn aggregate(records: &[TransactionRecord]) -> Vec<StoreAggregate> {
    let mut stores: BTreeMap<String, StoreAggregate> = BTreeMap::new();

    for record in records {
        let code = normalize_store_code(&record.store_code);
        let store = stores
            .entry(code)
            .or_insert_with_key(|code| StoreAggregate::new(code.clone()));

        store.quantity += record.quantity;
        store.revenue += record.total_excl_tax;
        store.line_count += 1;
        match record.purchase_cost {
            Some(cost) => store.purchase_cost += cost,
            None => store.unpriced_lines += 1,
        }
    }

    stores.into_values().collect()
}
