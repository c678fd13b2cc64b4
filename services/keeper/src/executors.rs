//! Action executors
//!
//! Each executor re-validates its preconditions against the snapshot right
//! before acting: another actor (the contract auto-starting a full
//! tournament, an admin cancelling by hand) may have moved the on-chain
//! state between the fetch and this point. A failed re-check is a benign
//! race and comes back as `Skipped`, not an error.

use tracing::{info, warn};

use lifecycle_logic::{generate_score, prize_breakdown, ScoreRng, TournamentStatus};

use crate::chain::{TournamentChain, TournamentSnapshot};
use crate::error::{KeeperError, Result};

/// What an executor did. The failed leg is the `Err` side of [`Result`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExecOutcome {
    /// A state-changing transaction was submitted and confirmed
    Applied,
    /// Preconditions no longer hold; nothing was written
    Skipped(String),
}

/// Cancel a tournament that reached its start time without enough players.
///
/// The contract refunds every joined player's entry fee on cancellation;
/// the keeper computes nothing.
pub async fn cancel_unfilled(
    chain: &dyn TournamentChain,
    snapshot: &TournamentSnapshot,
) -> Result<ExecOutcome> {
    if snapshot.status != TournamentStatus::Registration {
        return Ok(ExecOutcome::Skipped(format!(
            "not in registration phase ({:?})",
            snapshot.status
        )));
    }

    info!(
        tournament = snapshot.id,
        players = snapshot.current_players,
        "cancelling underfilled tournament"
    );
    let tx = chain.cancel_tournament(snapshot.id).await?;
    info!(tournament = snapshot.id, tx = ?tx, "tournament cancelled");

    Ok(ExecOutcome::Applied)
}

/// Generate and submit scores for every player in a running tournament.
///
/// Best effort across the roster: one player's failed submission is logged
/// and the loop moves to the next. Applied as long as at least one score
/// landed; a roster where every submission failed is a write error.
///
/// The "already simulated" check probes only the first player's score. A
/// legitimately zero score for that player would re-trigger simulation on
/// the next pass; known race, accepted.
pub async fn simulate_gameplay(
    chain: &dyn TournamentChain,
    snapshot: &TournamentSnapshot,
    seed: u64,
) -> Result<ExecOutcome> {
    if snapshot.status != TournamentStatus::InProgress {
        return Ok(ExecOutcome::Skipped(format!(
            "not in progress ({:?})",
            snapshot.status
        )));
    }
    if snapshot.players.is_empty() {
        return Ok(ExecOutcome::Skipped("no players joined".into()));
    }

    match chain.player_score(snapshot.id, snapshot.players[0]).await {
        Ok(score) if score > 0 => {
            return Ok(ExecOutcome::Skipped("scores already submitted".into()));
        }
        Ok(_) => {}
        // Probe failure is not decisive; proceed with simulation
        Err(err) => warn!(
            tournament = snapshot.id,
            error = %err,
            "could not check existing scores, simulating anyway"
        ),
    }

    info!(
        tournament = snapshot.id,
        game_type = ?snapshot.game_type,
        players = snapshot.players.len(),
        "simulating gameplay"
    );

    let mut submitted = 0usize;
    let mut failed = 0usize;
    for (index, player) in snapshot.players.iter().enumerate() {
        let mut rng = ScoreRng::new(seed, snapshot.id, index as u32);
        let score = generate_score(&snapshot.game_type, &mut rng);

        match chain.submit_score(snapshot.id, *player, score).await {
            Ok(tx) => {
                info!(
                    tournament = snapshot.id,
                    player = ?player,
                    score,
                    tx = ?tx,
                    "score submitted"
                );
                submitted += 1;
            }
            Err(err) => {
                warn!(
                    tournament = snapshot.id,
                    player = ?player,
                    error = %err,
                    "score submission failed, continuing with roster"
                );
                failed += 1;
            }
        }
    }

    if submitted == 0 {
        return Err(KeeperError::ChainWrite(format!(
            "tournament {}: all {} score submissions failed",
            snapshot.id, failed
        )));
    }

    info!(
        tournament = snapshot.id,
        submitted, failed, "gameplay simulation complete"
    );
    Ok(ExecOutcome::Applied)
}

/// Finalize an ended tournament; the contract ranks winners and pays out.
///
/// The winner read-back afterwards is reporting only (percentages
/// 100 / 70-30 / 50-30-20); its failure does not undo the finalize.
pub async fn finalize(
    chain: &dyn TournamentChain,
    snapshot: &TournamentSnapshot,
    now: u64,
) -> Result<ExecOutcome> {
    if snapshot.status != TournamentStatus::InProgress {
        return Ok(ExecOutcome::Skipped(format!(
            "not in progress ({:?})",
            snapshot.status
        )));
    }
    if now < snapshot.end_time {
        return Ok(ExecOutcome::Skipped(format!(
            "not ended yet (now {now}, ends {})",
            snapshot.end_time
        )));
    }

    let tx = chain.finalize_tournament(snapshot.id).await?;
    info!(tournament = snapshot.id, tx = ?tx, "tournament finalized");

    match chain.tournament_winners(snapshot.id).await {
        Ok(winners) => {
            let pool = snapshot.prize_pool_display();
            for (share, winner) in prize_breakdown(pool, winners.len()).iter().zip(&winners) {
                info!(
                    tournament = snapshot.id,
                    rank = share.rank,
                    winner = ?winner,
                    percent = share.percent,
                    amount = share.amount,
                    "prize share"
                );
            }
        }
        Err(err) => warn!(
            tournament = snapshot.id,
            error = %err,
            "could not fetch winners for reporting"
        ),
    }

    Ok(ExecOutcome::Applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::mock::{snapshot, MockChain};
    use ethers::types::Address;
    use lifecycle_logic::GameType;

    fn players(n: u8) -> Vec<Address> {
        (1..=n).map(Address::repeat_byte).collect()
    }

    #[tokio::test]
    async fn test_cancel_applies_in_registration() {
        let mut snap = snapshot(1, TournamentStatus::Registration);
        snap.current_players = 1;
        let chain = MockChain::with_tournaments(vec![snap.clone()]);

        let outcome = cancel_unfilled(&chain, &snap).await.unwrap();
        assert_eq!(outcome, ExecOutcome::Applied);
        assert_eq!(*chain.cancels.lock(), vec![1]);
    }

    #[tokio::test]
    async fn test_cancel_skips_when_already_started() {
        // Race: the contract started the tournament between fetch and act
        let snap = snapshot(1, TournamentStatus::InProgress);
        let chain = MockChain::with_tournaments(vec![snap.clone()]);

        let outcome = cancel_unfilled(&chain, &snap).await.unwrap();
        assert!(matches!(outcome, ExecOutcome::Skipped(_)));
        assert_eq!(chain.write_count(), 0);
    }

    #[tokio::test]
    async fn test_simulate_submits_for_full_roster() {
        let mut snap = snapshot(3, TournamentStatus::InProgress);
        snap.players = players(4);
        snap.current_players = 4;
        snap.game_type = GameType::FreeToPlay;
        let chain = MockChain::with_tournaments(vec![snap.clone()]);

        let outcome = simulate_gameplay(&chain, &snap, 42).await.unwrap();
        assert_eq!(outcome, ExecOutcome::Applied);

        let submits = chain.submits.lock();
        assert_eq!(submits.len(), 4);
        for (id, _, score) in submits.iter() {
            assert_eq!(*id, 3);
            assert!(*score >= 100 && *score <= 800);
        }
    }

    #[tokio::test]
    async fn test_simulate_skips_when_scores_exist() {
        let mut snap = snapshot(3, TournamentStatus::InProgress);
        snap.players = players(2);
        snap.current_players = 2;
        let chain = MockChain::with_tournaments(vec![snap.clone()]);
        chain.scores.lock().insert((3, snap.players[0]), 740);

        let outcome = simulate_gameplay(&chain, &snap, 42).await.unwrap();
        assert!(matches!(outcome, ExecOutcome::Skipped(_)));
        assert_eq!(chain.write_count(), 0);
    }

    #[tokio::test]
    async fn test_simulate_continues_past_single_player_failure() {
        let mut snap = snapshot(3, TournamentStatus::InProgress);
        snap.players = players(3);
        snap.current_players = 3;
        let chain = MockChain::with_tournaments(vec![snap.clone()]);
        chain.failing_players.lock().insert(snap.players[1]);

        let outcome = simulate_gameplay(&chain, &snap, 42).await.unwrap();
        assert_eq!(outcome, ExecOutcome::Applied);
        assert_eq!(chain.submits.lock().len(), 2);
    }

    #[tokio::test]
    async fn test_simulate_all_failures_is_write_error() {
        let mut snap = snapshot(3, TournamentStatus::InProgress);
        snap.players = players(2);
        snap.current_players = 2;
        let chain = MockChain::with_tournaments(vec![snap.clone()]);
        for player in &snap.players {
            chain.failing_players.lock().insert(*player);
        }

        let err = simulate_gameplay(&chain, &snap, 42).await.unwrap_err();
        assert!(matches!(err, KeeperError::ChainWrite(_)));
    }

    #[tokio::test]
    async fn test_simulate_empty_roster_skips() {
        let snap = snapshot(3, TournamentStatus::InProgress);
        let chain = MockChain::with_tournaments(vec![snap.clone()]);

        let outcome = simulate_gameplay(&chain, &snap, 42).await.unwrap();
        assert!(matches!(outcome, ExecOutcome::Skipped(_)));
    }

    #[tokio::test]
    async fn test_finalize_applies_after_end() {
        let mut snap = snapshot(5, TournamentStatus::InProgress);
        snap.players = players(3);
        snap.current_players = 3;
        let chain = MockChain::with_tournaments(vec![snap.clone()]);
        chain.winners.lock().insert(5, players(3));

        let outcome = finalize(&chain, &snap, snap.end_time).await.unwrap();
        assert_eq!(outcome, ExecOutcome::Applied);
        assert_eq!(*chain.finalizes.lock(), vec![5]);
    }

    #[tokio::test]
    async fn test_finalize_skips_before_end() {
        let snap = snapshot(5, TournamentStatus::InProgress);
        let chain = MockChain::with_tournaments(vec![snap.clone()]);

        let outcome = finalize(&chain, &snap, snap.end_time - 1).await.unwrap();
        assert!(matches!(outcome, ExecOutcome::Skipped(_)));
        assert_eq!(chain.write_count(), 0);
    }

    #[tokio::test]
    async fn test_finalize_survives_winner_readback_failure() {
        // Winners read returns empty rather than erroring in the mock;
        // an absent winner list must not undo the Applied outcome
        let snap = snapshot(5, TournamentStatus::InProgress);
        let chain = MockChain::with_tournaments(vec![snap.clone()]);

        let outcome = finalize(&chain, &snap, snap.end_time + 10).await.unwrap();
        assert_eq!(outcome, ExecOutcome::Applied);
    }
}
