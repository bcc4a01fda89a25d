//! Following a corridor means keeping the current heading, or turning the only way the corridor
//! bends. Only junctions offer a real choice.

use itertools::Itertools;
use maze_game_types::types::{
    AdversaryIDGettableGame, AdversaryId, Agent, LastMoveGettableGame, Move, MoveGeneratableGame,
    ShortestPathGame, ThreatGettableGame,
};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CorridorError {
    #[error("heading {requested} hit a dead end, the only way out is back")]
    NoWayForward { requested: Move },
    #[error("heading {requested} isn't possible and {options:?} are all open, so this isn't a corridor")]
    AmbiguousCorridor { requested: Move, options: Vec<Move> },
}

/// Keep moving in `direction` if possible, otherwise take the single way forward that doesn't
/// reverse your last move
pub fn follow_corridor<T>(game: &T, direction: Move) -> Result<Move, CorridorError>
where
    T: MoveGeneratableGame + LastMoveGettableGame,
{
    let possible_moves = game.possible_moves(Agent::You);

    if possible_moves.contains(&direction) {
        return Ok(direction);
    }

    let reverse = game.last_move(Agent::You).opposite();
    let options = possible_moves
        .into_iter()
        .filter(|m| *m != reverse)
        .collect_vec();

    match options.len() {
        1 => Ok(options[0]),
        0 => Err(CorridorError::NoWayForward {
            requested: direction,
        }),
        _ => Err(CorridorError::AmbiguousCorridor {
            requested: direction,
            options,
        }),
    }
}

/// The closest hostile adversary strictly within `radius` steps of you. Adversaries that are
/// fleeing or still in their lair are ignored, and ties go to the lowest id
pub fn nearest_threat<T>(game: &T, radius: u32) -> Option<(AdversaryId, u32)>
where
    T: AdversaryIDGettableGame + ThreatGettableGame + ShortestPathGame,
{
    let you = game.you_position();

    game.adversary_ids()
        .into_iter()
        .filter(|id| !game.is_fleeing(*id) && game.lair_time(*id) == 0)
        .filter_map(|id| {
            let distance =
                game.shortest_path_distance(&you, &game.position_of(Agent::Adversary(id)))?;
            Some((id, distance))
        })
        .filter(|(_, distance)| *distance < radius)
        .min_by_key(|(_, distance)| *distance)
}

/// [follow_corridor], except a hostile adversary within `threat_radius` overrides the corridor
/// and you move away from the nearest one instead
pub fn follow_corridor_evading<T>(
    game: &T,
    direction: Move,
    threat_radius: u32,
) -> Result<Move, CorridorError>
where
    T: MoveGeneratableGame
        + LastMoveGettableGame
        + AdversaryIDGettableGame
        + ThreatGettableGame
        + ShortestPathGame,
{
    if let Some((id, distance)) = nearest_threat(game, threat_radius) {
        let threat = game.position_of(Agent::Adversary(id));

        if let Some(away) = game.next_move_away_from(&game.you_position(), &threat) {
            debug!(%id, distance, %away, "Evading");
            return Ok(away);
        }
    }

    follow_corridor(game, direction)
}

#[cfg(test)]
mod test {
    use maze_game_types::types::SimulableGame;

    use crate::compact_maze_from_json;

    use super::*;

    #[test]
    fn test_keeps_heading() {
        let fixture = include_str!("../fixtures/bent_corridor.json");
        let game = compact_maze_from_json(fixture).unwrap();

        assert_eq!(follow_corridor(&game, Move::Right), Ok(Move::Right));
        assert_eq!(follow_corridor(&game, Move::Left), Ok(Move::Left));
    }

    #[test]
    fn test_turns_with_the_corridor() {
        let fixture = include_str!("../fixtures/bent_corridor.json");
        let mut game = compact_maze_from_json(fixture).unwrap();
        game.advance(Move::Right, &[]);

        for requested in [Move::Up, Move::Right, Move::Neutral] {
            assert_eq!(follow_corridor(&game, requested), Ok(Move::Down));
        }
    }

    #[test]
    fn test_dead_end_and_junction_are_errors() {
        let game =
            compact_maze_from_json(r##"{ "board": { "layout": ["#.P#"], "you_last_move": "right" } }"##)
                .unwrap();
        assert_eq!(
            follow_corridor(&game, Move::Right),
            Err(CorridorError::NoWayForward {
                requested: Move::Right
            })
        );

        let fixture = include_str!("../fixtures/crossroads.json");
        let game = compact_maze_from_json(fixture).unwrap();
        assert!(matches!(
            follow_corridor(&game, Move::Up),
            Err(CorridorError::AmbiguousCorridor { .. })
        ));
    }

    #[test]
    fn test_evades_nearest_threat() {
        let fixture = include_str!("../fixtures/bent_corridor.json");
        let game = compact_maze_from_json(fixture).unwrap();

        assert_eq!(nearest_threat(&game, 9), Some((AdversaryId(0), 7)));
        assert_eq!(nearest_threat(&game, 7), None);

        assert_eq!(follow_corridor_evading(&game, Move::Right, 9), Ok(Move::Left));
        assert_eq!(follow_corridor_evading(&game, Move::Right, 7), Ok(Move::Right));
    }

    #[test]
    fn test_fleeing_adversaries_are_not_threats() {
        let game = compact_maze_from_json(
            r##"{ "board": {
                "layout": ["#..P.1#"],
                "you_last_move": "right",
                "adversaries": [{ "fleeing_time": 3 }]
            } }"##,
        )
        .unwrap();

        assert_eq!(nearest_threat(&game, 9), None);
        assert_eq!(follow_corridor_evading(&game, Move::Right, 9), Ok(Move::Right));
    }
}
