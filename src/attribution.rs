use std::collections::BTreeMap;

use crate::{
    account::PlayerAccountIds,
    cashflow::{Cashflow, CashflowOverflow},
    model::{AccountId, Transaction},
};

/// The attribution of one joint account's transactions.
///
/// `shared_cashflows` holds one bucket for every joint account player 1 knows
/// about, the account itself included, whether or not money moved between
/// them.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct AccountByPlayer {
    pub account_id: AccountId,
    pub player_1: Cashflow,
    pub player_2: Cashflow,
    pub unaccounted: Cashflow,
    pub shared_cashflows: BTreeMap<AccountId, Cashflow>,
    pub transaction_count: usize,
}

impl AccountByPlayer {
    /// Transfers with other joint accounts, leaving out the account's own
    /// bucket.
    pub fn transfers_with_other_joint_accounts(
        &self,
    ) -> impl Iterator<Item = (&AccountId, &Cashflow)> {
        self.shared_cashflows
            .iter()
            .filter(move |(id, _)| **id != self.account_id)
    }

    /// Every bucket merged together. Its net equals the sum of all recorded
    /// amounts.
    pub fn total(&self) -> Result<Cashflow, CashflowOverflow> {
        Cashflow::merge_all(
            self.shared_cashflows
                .values()
                .chain([&self.player_1, &self.player_2, &self.unaccounted]),
        )
    }
}

/// Which bucket a transaction lands in.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Contributor {
    Player1,
    Player2,
    Shared(AccountId),
    Unaccounted,
}

/// Incremental attribution of one joint account.
/// Transactions can be recorded page by page as they are fetched; the
/// buckets are owned by this value until [`Attribution::finish`].
pub struct Attribution<'a> {
    player_1: &'a PlayerAccountIds,
    player_2: &'a PlayerAccountIds,
    result: AccountByPlayer,
}

impl<'a> Attribution<'a> {
    pub fn new(
        account_id: &str,
        player_1: &'a PlayerAccountIds,
        player_2: &'a PlayerAccountIds,
    ) -> Self {
        let shared_cashflows = player_1
            .joint_accounts
            .iter()
            .map(|id| (id.clone(), Cashflow::empty()))
            .collect();
        Self {
            player_1,
            player_2,
            result: AccountByPlayer {
                account_id: account_id.to_string(),
                player_1: Cashflow::empty(),
                player_2: Cashflow::empty(),
                unaccounted: Cashflow::empty(),
                shared_cashflows,
                transaction_count: 0,
            },
        }
    }

    /// First match wins: player 1's individual accounts, then player 2's,
    /// then player 1's joint accounts.
    pub fn contributor(&self, transaction: &Transaction) -> Contributor {
        match transaction.counterparty.as_deref() {
            Some(id) if self.player_1.owns_individually(id) => Contributor::Player1,
            Some(id) if self.player_2.owns_individually(id) => Contributor::Player2,
            Some(id) if self.player_1.shares(id) => Contributor::Shared(id.to_string()),
            _ => Contributor::Unaccounted,
        }
    }

    pub fn record(&mut self, transaction: &Transaction) -> Result<(), CashflowOverflow> {
        let bucket = match self.contributor(transaction) {
            Contributor::Player1 => &mut self.result.player_1,
            Contributor::Player2 => &mut self.result.player_2,
            Contributor::Shared(id) => self.result.shared_cashflows.entry(id).or_default(),
            Contributor::Unaccounted => &mut self.result.unaccounted,
        };
        bucket.update(transaction.amount)?;
        self.result.transaction_count += 1;
        Ok(())
    }

    pub fn record_all<'t>(
        &mut self,
        transactions: impl IntoIterator<Item = &'t Transaction>,
    ) -> Result<(), CashflowOverflow> {
        transactions
            .into_iter()
            .try_for_each(|transaction| self.record(transaction))
    }

    pub fn finish(self) -> AccountByPlayer {
        self.result
    }
}

/// Attributes a complete transaction list of the joint account `account_id`.
pub fn attribute<'t>(
    account_id: &str,
    transactions: impl IntoIterator<Item = &'t Transaction>,
    player_1: &PlayerAccountIds,
    player_2: &PlayerAccountIds,
) -> Result<AccountByPlayer, CashflowOverflow> {
    let mut attribution = Attribution::new(account_id, player_1, player_2);
    attribution.record_all(transactions)?;
    Ok(attribution.finish())
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use rstest::rstest;

    use crate::{
        account::PlayerAccountIds,
        cashflow::{Cashflow, CashflowOverflow},
        model::Transaction,
    };

    use super::{attribute, Attribution, Contributor};

    const SHARED: &str = "Shared";
    const OTHER_SHARED: &str = "Holiday";

    #[test]
    fn scenario_with_every_kind_of_counterparty() {
        let (player_1, player_2) = players();
        let transactions = vec![
            Transaction::new(500, Some("P1a")),
            Transaction::new(-300, Some("P2a")),
            Transaction::new(100, None),
            Transaction::new(-50, Some(SHARED)),
        ];

        let result = attribute(SHARED, &transactions, &player_1, &player_2).unwrap();

        assert_eq!(result.account_id, SHARED);
        assert_eq!(result.player_1, Cashflow::new(500, 0));
        assert_eq!(result.player_2, Cashflow::new(0, -300));
        assert_eq!(result.unaccounted, Cashflow::new(100, 0));
        assert_eq!(result.shared_cashflows[SHARED], Cashflow::new(0, -50));
        assert_eq!(result.shared_cashflows[OTHER_SHARED], Cashflow::empty());
        assert_eq!(result.transaction_count, 4);
    }

    #[test]
    fn empty_history_keeps_a_zero_bucket_per_joint_account() {
        let (player_1, player_2) = players();

        let result =
            attribute(SHARED, &Vec::<Transaction>::new(), &player_1, &player_2).unwrap();

        assert_eq!(result.player_1, Cashflow::empty());
        assert_eq!(result.player_2, Cashflow::empty());
        assert_eq!(result.unaccounted, Cashflow::empty());
        assert_eq!(
            result.shared_cashflows,
            BTreeMap::from([
                (SHARED.to_string(), Cashflow::empty()),
                (OTHER_SHARED.to_string(), Cashflow::empty()),
            ])
        );
        assert_eq!(result.transaction_count, 0);
    }

    #[rstest]
    #[case(Some("P1a"), Contributor::Player1)]
    #[case(Some("P1b"), Contributor::Player1)]
    #[case(Some("P2a"), Contributor::Player2)]
    #[case(Some(SHARED), Contributor::Shared(SHARED.to_string()))]
    #[case(Some(OTHER_SHARED), Contributor::Shared(OTHER_SHARED.to_string()))]
    #[case(Some("merchant"), Contributor::Unaccounted)]
    #[case(None, Contributor::Unaccounted)]
    fn counterparty_decides_the_contributor(
        #[case] counterparty: Option<&str>,
        #[case] expected: Contributor,
    ) {
        let (player_1, player_2) = players();
        let attribution = Attribution::new(SHARED, &player_1, &player_2);
        assert_eq!(
            attribution.contributor(&Transaction::new(1, counterparty)),
            expected
        );
    }

    #[test]
    fn player_1_wins_when_both_players_claim_the_counterparty() {
        let player_1 = player(&["dup"], &[SHARED]);
        let player_2 = player(&["dup"], &[SHARED]);

        let result = attribute(
            SHARED,
            &[Transaction::new(10, Some("dup"))],
            &player_1,
            &player_2,
        )
        .unwrap();

        assert_eq!(result.player_1, Cashflow::new(10, 0));
        assert_eq!(result.player_2, Cashflow::empty());
    }

    #[test]
    fn individual_account_takes_precedence_over_joint_membership() {
        let player_1 = player(&["both"], &[SHARED, "both"]);
        let player_2 = player(&[], &[SHARED, "both"]);
        let attribution = Attribution::new(SHARED, &player_1, &player_2);
        assert_eq!(
            attribution.contributor(&Transaction::new(-5, Some("both"))),
            Contributor::Player1
        );
    }

    #[rstest]
    #[case(vec![])]
    #[case(vec![(0, None)])]
    #[case(vec![(500, Some("P1a")), (-300, Some("P2a")), (100, None), (-50, Some(SHARED))])]
    #[case(vec![(-7, Some(OTHER_SHARED)), (7, Some(OTHER_SHARED)), (3, Some("P1b")), (-2, Some("unknown"))])]
    fn every_transaction_lands_in_exactly_one_bucket(#[case] rows: Vec<(i64, Option<&str>)>) {
        let (player_1, player_2) = players();
        let transactions: Vec<Transaction> = rows
            .iter()
            .map(|(amount, counterparty)| Transaction::new(*amount, *counterparty))
            .collect();

        let result = attribute(SHARED, &transactions, &player_1, &player_2).unwrap();

        let expected_net: i64 = rows.iter().map(|(amount, _)| amount).sum();
        let expected_in: i64 = rows
            .iter()
            .map(|(amount, _)| *amount)
            .filter(|amount| *amount >= 0)
            .sum();
        let total = result.total().unwrap();
        assert_eq!(total.net().0, expected_net);
        assert_eq!(total.in_flow.0, expected_in);
        assert_eq!(result.transaction_count, rows.len());
    }

    #[test]
    fn shared_keys_always_equal_player_1_joint_accounts() {
        let (player_1, player_2) = players();
        let result = attribute(
            OTHER_SHARED,
            &[Transaction::new(1, Some("not-a-joint-account"))],
            &player_1,
            &player_2,
        )
        .unwrap();
        let keys: BTreeSet<&str> = result.shared_cashflows.keys().map(String::as_str).collect();
        assert_eq!(keys, BTreeSet::from([SHARED, OTHER_SHARED]));
    }

    #[test]
    fn recording_page_by_page_matches_recording_at_once() {
        let (player_1, player_2) = players();
        let first_page = vec![Transaction::new(5, Some("P1a")), Transaction::new(-1, None)];
        let second_page = vec![Transaction::new(-4, Some(OTHER_SHARED))];

        let mut attribution = Attribution::new(SHARED, &player_1, &player_2);
        attribution.record_all(&first_page).unwrap();
        attribution.record_all(&second_page).unwrap();
        let paged = attribution.finish();

        let all: Vec<Transaction> = first_page.into_iter().chain(second_page).collect();
        assert_eq!(Ok(paged), attribute(SHARED, &all, &player_1, &player_2));
    }

    #[test]
    fn self_bucket_is_left_out_of_transfers_with_other_joint_accounts() {
        let (player_1, player_2) = players();
        let result = attribute(
            SHARED,
            &[
                Transaction::new(-50, Some(SHARED)),
                Transaction::new(20, Some(OTHER_SHARED)),
            ],
            &player_1,
            &player_2,
        )
        .unwrap();
        let transfers: Vec<_> = result.transfers_with_other_joint_accounts().collect();
        assert_eq!(
            transfers,
            vec![(&OTHER_SHARED.to_string(), &Cashflow::new(20, 0))]
        );
    }

    #[test]
    fn overflowing_bucket_stops_the_attribution() {
        let (player_1, player_2) = players();
        let mut attribution = Attribution::new(SHARED, &player_1, &player_2);

        attribution
            .record(&Transaction::new(i64::MAX, Some("P1a")))
            .unwrap();
        assert_eq!(
            attribution.record(&Transaction::new(1, Some("P1b"))),
            Err(CashflowOverflow)
        );
        assert_eq!(
            attribution.record_all(&[Transaction::new(-3, Some("P2a"))]),
            Ok(())
        );

        let result = attribution.finish();
        assert_eq!(result.player_1, Cashflow::new(i64::MAX, 0));
        assert_eq!(result.player_2, Cashflow::new(0, -3));
        assert_eq!(result.transaction_count, 2);
        assert_eq!(
            attribute(
                SHARED,
                &[
                    Transaction::new(i64::MAX, None),
                    Transaction::new(i64::MAX, None)
                ],
                &player_1,
                &player_2
            ),
            Err(CashflowOverflow)
        );
    }

    fn players() -> (PlayerAccountIds, PlayerAccountIds) {
        (
            player(&["P1a", "P1b"], &[SHARED, OTHER_SHARED]),
            player(&["P2a"], &[SHARED, OTHER_SHARED]),
        )
    }

    fn player(individual: &[&str], joint: &[&str]) -> PlayerAccountIds {
        PlayerAccountIds {
            individual_accounts: individual.iter().map(|id| id.to_string()).collect(),
            joint_accounts: joint.iter().map(|id| id.to_string()).collect(),
        }
    }
}
