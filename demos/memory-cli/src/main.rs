//! Plays one game of memory with a perfect-recall bot, then (when
//! `MEMGAME_EMAIL` and `MEMGAME_PASSWORD` are set) saves it and prints the
//! leaderboard.
//!
//! ```text
//! memory-cli [2x2|3x4|4x4|6x6]
//! ```

use std::collections::HashMap;
use std::time::Duration;

use memgame::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// Shuffled face values, each appearing exactly twice.
fn deal(board: BoardSize, rng: &mut impl Rng) -> Vec<u32> {
    let mut cards: Vec<u32> = (0..board.pair_count()).flat_map(|f| [f, f]).collect();
    cards.shuffle(rng);
    cards
}

/// A bot that never forgets a card it has seen.
#[derive(Default)]
struct MemoryBot {
    /// Face → index of the one revealed, still unmatched card.
    seen: HashMap<u32, usize>,
    /// Pairs whose both positions are known.
    known_pairs: Vec<(usize, usize)>,
    next_unseen: usize,
}

impl MemoryBot {
    /// Flips two cards. `Some(true)` on a match, `None` once the table is
    /// cleared.
    fn take_turn(&mut self, cards: &[u32]) -> Option<bool> {
        if self.known_pairs.pop().is_some() {
            return Some(true);
        }

        let first = self.reveal(cards)?;
        if self.seen.remove(&cards[first]).is_some() {
            return Some(true);
        }
        let second = self.reveal(cards)?;
        if cards[first] == cards[second] {
            return Some(true);
        }

        self.seen.insert(cards[first], first);
        match self.seen.remove(&cards[second]) {
            Some(earlier) => self.known_pairs.push((earlier, second)),
            None => {
                self.seen.insert(cards[second], second);
            }
        }
        Some(false)
    }

    fn reveal(&mut self, cards: &[u32]) -> Option<usize> {
        let index = self.next_unseen;
        (index < cards.len()).then(|| {
            self.next_unseen += 1;
            index
        })
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

async fn sign_in_from_env(client: &mut MemgameClient) -> bool {
    let (Ok(email), Ok(password)) = (
        std::env::var("MEMGAME_EMAIL"),
        std::env::var("MEMGAME_PASSWORD"),
    ) else {
        eprintln!("MEMGAME_EMAIL/MEMGAME_PASSWORD not set, playing offline");
        return false;
    };
    match client.sign_in(&Credentials::new(email, password)).await {
        Ok(user) => {
            eprintln!("signed in as {}", user.profile_str("nickname").unwrap_or("?"));
            true
        }
        Err(e) => {
            eprintln!("sign-in failed ({e}), playing offline");
            false
        }
    }
}

fn print_board(title: &str, records: &[GameRecord]) {
    println!("\n{title}");
    if records.is_empty() {
        println!("  (empty)");
    }
    for (rank, record) in records.iter().take(10).enumerate() {
        let when = record
            .created_at_millis()
            .map(format_date_simple)
            .unwrap_or_default();
        let time = record
            .total_time()
            .map(|ms| format_timer(ms as u64))
            .unwrap_or_default();
        println!(
            "  {:>2}. {:>6} pts  {:>3} turns  {:>8}s  {}",
            rank + 1,
            record.custom.score,
            record.custom.turns,
            time,
            when
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    memgame::init_tracing();

    let key = std::env::args().nth(1).unwrap_or_else(|| "3x4".into());
    let Some(board) = BoardSize::from_key(&key) else {
        return Err(format!("unknown board size {key:?}, expected one of 2x2, 3x4, 4x4, 6x6").into());
    };

    let mut client = MemgameClient::builder()
        .config(ClientConfig::from_env())
        .build()?;
    let online = sign_in_from_env(&mut client).await;

    let mut rng = StdRng::from_os_rng();
    let cards = deal(board, &mut rng);
    let mut bot = MemoryBot::default();

    let game = client.sessions_mut();
    game.select_board_size(board.key());
    game.start_new_game();
    game.start_timer()?;

    while let Some(matched) = bot.take_turn(&cards) {
        game.record_turn();
        if matched {
            game.record_pair();
        }
        tokio::time::sleep(Duration::from_millis(rng.random_range(20..80))).await;
    }

    let score = game.compute_final_score_for(board);
    let session = game.session();
    tracing::info!(board = %board, score, "playthrough finished");
    println!(
        "{board}: {} pairs in {} turns, {}s, score {score}",
        session.pairs_found,
        session.turns,
        format_timer(session.timer_millis)
    );

    if !online {
        return Ok(());
    }

    match client.save_game().await {
        Ok(id) => println!("saved as game {id}"),
        Err(e) => eprintln!("save failed: {e}"),
    }
    let board_id = board.board_id().to_string();
    if client.load_global_leaderboard(&board_id, None).await.is_ok() {
        print_board("Global leaderboard", client.sessions().global_leaderboard());
    }
    if client
        .load_personal_leaderboard(&board_id, Some(SortCriteria::new(SortCriteria::TURNS)))
        .await
        .is_ok()
    {
        print_board("Your best (by turns)", client.sessions().personal_leaderboard());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(board: BoardSize, seed: u64) -> (u32, u32) {
        let cards = deal(board, &mut StdRng::seed_from_u64(seed));
        let mut bot = MemoryBot::default();
        let (mut turns, mut pairs) = (0, 0);
        while let Some(matched) = bot.take_turn(&cards) {
            turns += 1;
            if matched {
                pairs += 1;
            }
        }
        (turns, pairs)
    }

    #[test]
    fn test_deal_has_every_face_twice() {
        let cards = deal(BoardSize::FourByFour, &mut StdRng::seed_from_u64(1));
        assert_eq!(cards.len(), 16);
        for face in 0..8 {
            assert_eq!(cards.iter().filter(|&&c| c == face).count(), 2);
        }
    }

    #[test]
    fn test_bot_clears_every_board() {
        for board in BoardSize::ALL {
            for seed in 0..20 {
                let (turns, pairs) = play(board, seed);
                let n = board.pair_count();
                assert_eq!(pairs, n, "{board} seed {seed}");
                assert!(turns >= n && turns <= 2 * n, "{board} seed {seed}: {turns} turns");
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_bot_playthrough_scores_against_mock_backend() {
        let mock = std::sync::Arc::new(MockTransport::new());
        let mut client = MemgameClientBuilder::new().build_with(std::sync::Arc::clone(&mock));
        let cards = deal(BoardSize::TwoByTwo, &mut StdRng::seed_from_u64(7));
        let mut bot = MemoryBot::default();

        let game = client.sessions_mut();
        game.start_new_game();
        game.start_timer().unwrap();
        while let Some(matched) = bot.take_turn(&cards) {
            game.record_turn();
            if matched {
                game.record_pair();
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        let score = game.compute_final_score_for(BoardSize::TwoByTwo);

        assert_eq!(game.session().pairs_found, 2);
        assert!(score > 0);
        assert_eq!(game.status(), SessionStatus::Completed);
    }
}
