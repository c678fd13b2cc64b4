//! Prize-split reporting
//!
//! Display-only arithmetic. The contract computes and pays the actual
//! winnings; the keeper just formats the breakdown for logs and the admin
//! API after a finalize lands.

use serde::{Deserialize, Serialize};

/// Winner payout percentages by placing count: 100 / 70-30 / 50-30-20
const SPLIT_SOLO: &[u32] = &[100];
const SPLIT_DUO: &[u32] = &[70, 30];
const SPLIT_TRIO: &[u32] = &[50, 30, 20];

/// One winner's share of the pool, for reporting
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrizeShare {
    /// 1-based placing
    pub rank: u32,
    pub percent: u32,
    pub amount: f64,
}

/// Percent table for a given number of winners.
///
/// The contract pays at most three places; four or more winners still
/// report the three-way split.
pub fn winner_percents(winner_count: usize) -> &'static [u32] {
    match winner_count {
        0 => &[],
        1 => SPLIT_SOLO,
        2 => SPLIT_DUO,
        _ => SPLIT_TRIO,
    }
}

/// Break a prize pool down into per-rank shares.
pub fn prize_breakdown(pool: f64, winner_count: usize) -> Vec<PrizeShare> {
    winner_percents(winner_count)
        .iter()
        .enumerate()
        .map(|(i, percent)| PrizeShare {
            rank: i as u32 + 1,
            percent: *percent,
            amount: pool * (*percent as f64) / 100.0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_way_split() {
        let shares = prize_breakdown(10.0, 3);
        assert_eq!(shares.len(), 3);
        assert_eq!(shares[0], PrizeShare { rank: 1, percent: 50, amount: 5.0 });
        assert_eq!(shares[1], PrizeShare { rank: 2, percent: 30, amount: 3.0 });
        assert_eq!(shares[2], PrizeShare { rank: 3, percent: 20, amount: 2.0 });
    }

    #[test]
    fn test_two_way_split() {
        let shares = prize_breakdown(10.0, 2);
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].amount, 7.0);
        assert_eq!(shares[1].amount, 3.0);
    }

    #[test]
    fn test_solo_winner_takes_all() {
        let shares = prize_breakdown(10.0, 1);
        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].percent, 100);
        assert_eq!(shares[0].amount, 10.0);
    }

    #[test]
    fn test_no_winners_no_shares() {
        assert!(prize_breakdown(10.0, 0).is_empty());
    }

    #[test]
    fn test_many_winners_reported_as_trio() {
        let shares = prize_breakdown(10.0, 5);
        assert_eq!(shares.len(), 3);
        assert_eq!(shares[0].percent, 50);
    }

    #[test]
    fn test_percents_sum_to_100() {
        for count in 1..=6 {
            let total: u32 = winner_percents(count).iter().sum();
            assert_eq!(total, 100, "{}-winner split does not sum to 100", count);
        }
    }
}
