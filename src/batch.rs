/*!
 * Batching policy for the bulk-persist pipeline
 *
 * Pure grouping of mapped customers into fixed-size batches; no I/O, so the
 * policy is unit-testable independently of parsing and persistence.
 */

use crate::customer::Customer;

/// Default number of customers per batch
///
/// Deliberately small: batches are persisted one at a time over a single
/// store connection, and the batch size bounds the cost of a per-row
/// fallback when a batch-level insert fails.
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Group customers into batches of up to `batch_size`, preserving input order
///
/// The final batch holds the remainder (1..batch_size) when the input is not
/// an exact multiple. A `batch_size` of 0 is clamped to 1.
pub fn into_batches(customers: Vec<Customer>, batch_size: usize) -> Vec<Vec<Customer>> {
    let batch_size = batch_size.max(1);
    let mut batches = Vec::with_capacity(customers.len().div_ceil(batch_size));
    let mut current = Vec::with_capacity(batch_size);

    for customer in customers {
        current.push(customer);
        if current.len() >= batch_size {
            batches.push(std::mem::replace(&mut current, Vec::with_capacity(batch_size)));
        }
    }

    if !current.is_empty() {
        batches.push(current);
    }

    batches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customers(n: usize) -> Vec<Customer> {
        (0..n)
            .map(|i| Customer::from_fields(i as i64, None, None, None, None))
            .collect()
    }

    #[test]
    fn test_125_rows_at_50_form_three_batches() {
        let batches = into_batches(customers(125), 50);
        let sizes: Vec<usize> = batches.iter().map(|b| b.len()).collect();
        assert_eq!(sizes, vec![50, 50, 25]);
    }

    #[test]
    fn test_exact_multiple_has_no_partial_batch() {
        let batches = into_batches(customers(100), 50);
        assert_eq!(batches.len(), 2);
        assert!(batches.iter().all(|b| b.len() == 50));
    }

    #[test]
    fn test_empty_input_forms_no_batches() {
        assert!(into_batches(customers(0), 50).is_empty());
    }

    #[test]
    fn test_order_preserved_across_batches() {
        let batches = into_batches(customers(7), 3);
        let ids: Vec<i64> = batches.into_iter().flatten().map(|c| c.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_zero_batch_size_clamped() {
        let batches = into_batches(customers(3), 0);
        assert_eq!(batches.len(), 3);
    }
}
