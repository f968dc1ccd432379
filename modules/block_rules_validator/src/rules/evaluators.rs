//! Evaluators for each block validation rule kind
//! Arguments are already typed; an out-of-range position means the rule does not apply

use crate::transactions::FlattenedTransactions;
use gatekeeper_common::validation::BlockRuleViolation;
use tracing::debug;

/// `NofX` - at most `limit` transactions of `family`
pub fn n_of_x(
    txns: &FlattenedTransactions<'_>,
    limit: usize,
    family: &str,
) -> Result<(), BlockRuleViolation> {
    let count = txns.iter().filter(|header| header.family_name == family).count();
    if count > limit {
        debug!("Too many transactions of type {family}: {count} > {limit}");
        return Err(BlockRuleViolation::TooManyOfFamily {
            family: family.to_string(),
            limit,
            count,
        });
    }
    Ok(())
}

/// `XatY` - the transaction at `index` is of `family`
pub fn x_at_y(
    txns: &FlattenedTransactions<'_>,
    family: &str,
    index: usize,
) -> Result<(), BlockRuleViolation> {
    let Some(header) = txns.get(index) else {
        debug!(
            "Block does not have enough transactions to validate XatY:{family},{index} ({} present)",
            txns.len()
        );
        return Ok(());
    };

    if header.family_name != family {
        debug!("Transaction at position {index} is not of type {family}");
        return Err(BlockRuleViolation::WrongFamilyAtPosition {
            index,
            expected: family.to_string(),
            actual: header.family_name.clone(),
        });
    }
    Ok(())
}

/// `local` - the transactions at `indices` are signed by the block signer
pub fn local(
    txns: &FlattenedTransactions<'_>,
    indices: &[usize],
    block_signer: &str,
) -> Result<(), BlockRuleViolation> {
    for &index in indices {
        let Some(header) = txns.get(index) else {
            debug!(
                "Block does not have enough transactions to validate local:{index} ({} present)",
                txns.len()
            );
            continue;
        };

        if header.signer_public_key != block_signer {
            debug!("Transaction at position {index} was not signed by the block signer");
            return Err(BlockRuleViolation::NotSignedByBlockSigner {
                index,
                block_signer: block_signer.to_string(),
                transaction_signer: header.signer_public_key.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatekeeper_test_utils::{make_block, make_block_with_batches};
    use test_case::test_case;

    #[test_case(&["intkey"], 1, "intkey" => matches Ok(()); "under limit")]
    #[test_case(&["intkey", "intkey"], 2, "intkey" => matches Ok(()); "at limit")]
    #[test_case(&["intkey", "intkey", "xo"], 1, "intkey" =>
        matches Err(BlockRuleViolation::TooManyOfFamily { limit: 1, count: 2, .. });
        "one over limit")]
    #[test_case(&["intkey"], 0, "intkey" =>
        matches Err(BlockRuleViolation::TooManyOfFamily { limit: 0, count: 1, .. });
        "zero limit")]
    #[test_case(&["xo", "xo"], 0, "intkey" => matches Ok(()); "family absent")]
    #[test_case(&[], 0, "intkey" => matches Ok(()); "empty block")]
    fn n_of_x_test(
        families: &[&str],
        limit: usize,
        family: &str,
    ) -> Result<(), BlockRuleViolation> {
        let block = make_block(families, "pub_key", true);
        n_of_x(&FlattenedTransactions::from_block(&block), limit, family)
    }

    #[test_case(&["intkey"], "intkey", 0 => matches Ok(()); "family matches")]
    #[test_case(&["intkey"], "blockinfo", 0 =>
        matches Err(BlockRuleViolation::WrongFamilyAtPosition { index: 0, .. });
        "family differs")]
    #[test_case(&["blockinfo", "intkey"], "intkey", 1 => matches Ok(()); "later position")]
    #[test_case(&["intkey"], "blockinfo", 1 => matches Ok(()); "position out of range")]
    #[test_case(&[], "blockinfo", 0 => matches Ok(()); "empty block")]
    fn x_at_y_test(
        families: &[&str],
        family: &str,
        index: usize,
    ) -> Result<(), BlockRuleViolation> {
        let block = make_block(families, "pub_key", true);
        x_at_y(&FlattenedTransactions::from_block(&block), family, index)
    }

    #[test]
    fn x_at_y_reports_actual_family() {
        let block = make_block(&["intkey"], "pub_key", true);
        let result = x_at_y(&FlattenedTransactions::from_block(&block), "blockinfo", 0);
        assert_eq!(
            result,
            Err(BlockRuleViolation::WrongFamilyAtPosition {
                index: 0,
                expected: "blockinfo".to_string(),
                actual: "intkey".to_string(),
            })
        );
    }

    #[test]
    fn local_accepts_block_signer() {
        let block = make_block(&["intkey"], "pub_key", true);
        assert!(local(&FlattenedTransactions::from_block(&block), &[0], "pub_key").is_ok());
    }

    #[test]
    fn local_rejects_other_signer() {
        let block = make_block(&["intkey"], "pub_key", false);
        let result = local(
            &FlattenedTransactions::from_block(&block),
            &[0],
            &block.header.signer_public_key,
        );
        assert_eq!(
            result,
            Err(BlockRuleViolation::NotSignedByBlockSigner {
                index: 0,
                block_signer: "other".to_string(),
                transaction_signer: "pub_key".to_string(),
            })
        );
    }

    #[test]
    fn local_skips_out_of_range_positions() {
        let block = make_block(&["intkey"], "pub_key", false);
        assert!(local(&FlattenedTransactions::from_block(&block), &[3], "other").is_ok());
    }

    #[test]
    fn local_checks_every_position() {
        let block = make_block_with_batches(
            &[&[("blockinfo", "proposer")], &[("intkey", "alice")]],
            "proposer",
        );
        let txns = FlattenedTransactions::from_block(&block);
        assert!(local(&txns, &[0], "proposer").is_ok());
        assert!(matches!(
            local(&txns, &[0, 1], "proposer"),
            Err(BlockRuleViolation::NotSignedByBlockSigner { index: 1, .. })
        ));
        assert!(local(&txns, &[0, 7], "proposer").is_ok());
    }
}
