use serde::Serialize;

/// Ledger entry categories.
///
/// Amounts are stored as positive magnitudes; the kind decides which way an
/// entry moves the balance. Approved chores are owed to the child, fines and
/// payouts settle against what is owed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Chore,
    Fine,
    Payment,
}

impl EntryKind {
    pub fn signed(self, amount: f64) -> f64 {
        match self {
            EntryKind::Chore => amount,
            EntryKind::Fine | EntryKind::Payment => -amount,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EntryKind::Chore => "Chore",
            EntryKind::Fine => "Fine",
            EntryKind::Payment => "Payment",
        }
    }
}

/// Derived money totals for one child. Recomputed on every query; nothing is
/// cached.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct BalanceSummary {
    pub pending_total: f64,
    pub approved_earnings: f64,
    pub total_fines: f64,
    pub total_payments: f64,
    pub balance: f64,
}

/// Roll the ledger up into totals. `pending_values` are the captured values
/// of not-yet-reviewed submissions; they preview future earnings but do not
/// contribute to the balance.
pub fn summarize(pending_values: &[f64], entries: &[(EntryKind, f64)]) -> BalanceSummary {
    let mut summary = BalanceSummary {
        pending_total: pending_values.iter().sum(),
        ..BalanceSummary::default()
    };

    for &(kind, amount) in entries {
        match kind {
            EntryKind::Chore => summary.approved_earnings += amount,
            EntryKind::Fine => summary.total_fines += amount,
            EntryKind::Payment => summary.total_payments += amount,
        }
        summary.balance += kind.signed(amount);
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn sign_convention_is_uniform() {
        assert!(close(EntryKind::Chore.signed(2.5), 2.5));
        assert!(close(EntryKind::Fine.signed(2.5), -2.5));
        assert!(close(EntryKind::Payment.signed(2.5), -2.5));
    }

    #[test]
    fn balance_is_the_signed_sum_of_entries() {
        let entries = [
            (EntryKind::Chore, 5.0),
            (EntryKind::Chore, 1.5),
            (EntryKind::Fine, 2.0),
            (EntryKind::Payment, 3.0),
        ];
        let summary = summarize(&[0.75], &entries);

        assert!(close(summary.pending_total, 0.75));
        assert!(close(summary.approved_earnings, 6.5));
        assert!(close(summary.total_fines, 2.0));
        assert!(close(summary.total_payments, 3.0));
        assert!(close(summary.balance, 1.5));

        let by_hand: f64 = entries.iter().map(|&(kind, amount)| kind.signed(amount)).sum();
        assert!(close(summary.balance, by_hand));
    }

    #[test]
    fn fines_and_payments_settle_against_earnings() {
        // A fine and a payout with nothing earned leave the child in the red.
        let summary = summarize(&[], &[(EntryKind::Fine, 5.0), (EntryKind::Payment, 5.0)]);
        assert!(close(summary.balance, -10.0));

        // Earnings covering both settle to zero.
        let entries = [
            (EntryKind::Chore, 10.0),
            (EntryKind::Fine, 5.0),
            (EntryKind::Payment, 5.0),
        ];
        let summary = summarize(&[], &entries);
        assert!(close(summary.balance, 0.0));
    }

    #[test]
    fn pending_values_do_not_move_the_balance() {
        let summary = summarize(&[4.0, 1.0], &[]);
        assert!(close(summary.pending_total, 5.0));
        assert!(close(summary.balance, 0.0));
    }
}
