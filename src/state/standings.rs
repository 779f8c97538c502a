//! Score-ordered projection of a roster, shared by the scoreboard, the winner
//! screen and the shared-game viewer.

use crate::state::game::Player;

/// One row of the scoreboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing {
    /// 1-based position after sorting by score.
    pub rank: usize,
    pub player: Player,
    /// Top of the board with at least one point.
    pub is_leader: bool,
    /// Progress towards the target, capped at 100.
    pub progress_percent: u8,
    /// Points still missing, 0 once the target is reached.
    pub points_to_win: u32,
    pub reached_target: bool,
}

/// Sort `players` by descending score; ties keep roster order.
pub fn standings(players: &[Player], target_score: u32) -> Vec<Standing> {
    let mut sorted = players.to_vec();
    sorted.sort_by(|a, b| b.score.cmp(&a.score));

    sorted
        .into_iter()
        .enumerate()
        .map(|(index, player)| Standing {
            rank: index + 1,
            is_leader: index == 0 && player.score > 0,
            progress_percent: progress_percent(player.score, target_score),
            points_to_win: target_score.saturating_sub(player.score),
            reached_target: player.score >= target_score,
            player,
        })
        .collect()
}

/// Everyone except the winner, best score first.
pub fn runners_up(players: &[Player], winner_id: &str, target_score: u32) -> Vec<Standing> {
    let others = players
        .iter()
        .filter(|player| player.id != winner_id)
        .cloned()
        .collect::<Vec<_>>();
    standings(&others, target_score)
}

fn progress_percent(score: u32, target_score: u32) -> u8 {
    if target_score == 0 {
        return 100;
    }
    let percent = (u64::from(score) * 100 / u64::from(target_score)).min(100);
    percent as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: &str, score: u32) -> Player {
        Player {
            id: id.into(),
            name: id.to_uppercase(),
            score,
            color: "#E53E3E".into(),
        }
    }

    #[test]
    fn sorts_by_score_and_keeps_ties_in_roster_order() {
        let players = vec![player("a", 10), player("b", 40), player("c", 10), player("d", 0)];
        let rows = standings(&players, 250);

        let order = rows.iter().map(|row| row.player.id.as_str()).collect::<Vec<_>>();
        assert_eq!(order, vec!["b", "a", "c", "d"]);
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[3].rank, 4);
        assert!(rows[0].is_leader);
        assert!(!rows[1].is_leader);
    }

    #[test]
    fn nobody_leads_before_the_first_point() {
        let rows = standings(&[player("a", 0), player("b", 0)], 250);
        assert!(rows.iter().all(|row| !row.is_leader));
    }

    #[test]
    fn progress_is_capped_and_points_to_win_saturate() {
        let rows = standings(&[player("a", 300), player("b", 125)], 250);
        assert_eq!(rows[0].progress_percent, 100);
        assert_eq!(rows[0].points_to_win, 0);
        assert!(rows[0].reached_target);
        assert_eq!(rows[1].progress_percent, 50);
        assert_eq!(rows[1].points_to_win, 125);
        assert!(!rows[1].reached_target);
    }

    #[test]
    fn runners_up_exclude_the_winner() {
        let players = vec![player("a", 10), player("b", 260), player("c", 30)];
        let rows = runners_up(&players, "b", 250);
        let order = rows.iter().map(|row| row.player.id.as_str()).collect::<Vec<_>>();
        assert_eq!(order, vec!["c", "a"]);
    }
}
