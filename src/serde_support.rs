use crate::board::Board;
use crate::color::Color;
use crate::game::{Game, DEFAULT_MAX_MOVES};
use crate::r#move::Move;
use crate::square::Square;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

impl Serialize for Square {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Square {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl Serialize for Move {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Move {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_placement())
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A game is stored as its starting position, move cap and the moves played:
/// `"<placement> <w|b> <max_moves>:<move>;<move>..."`. Deserializing replays
/// the moves. A missing cap reads as [`DEFAULT_MAX_MOVES`].
impl Serialize for Game {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut start = self.clone();
        while start.unmake_move() {}

        let moves: Vec<String> = self.move_history().iter().map(|m| m.to_string()).collect();
        let full = format!(
            "{} {} {}:{}",
            start.board().to_placement(),
            start.turn().to_char(),
            self.max_moves(),
            moves.join(";")
        );
        serializer.serialize_str(&full)
    }
}

impl<'de> Deserialize<'de> for Game {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;

        let (position, moves_str) = s
            .split_once(':')
            .ok_or_else(|| serde::de::Error::custom("missing ':' after position"))?;
        let mut fields = position.split(' ');
        let placement = fields.next().unwrap_or_default();
        let turn = fields
            .next()
            .ok_or_else(|| serde::de::Error::custom("missing side to move"))?;
        let max_moves = match fields.next() {
            Some(cap) => cap
                .parse::<usize>()
                .map_err(|e| serde::de::Error::custom(format!("Invalid move cap {}: {}", cap, e)))?,
            None => DEFAULT_MAX_MOVES,
        };
        if fields.next().is_some() {
            return Err(serde::de::Error::custom("trailing fields after move cap"));
        }

        let board: Board = placement.parse().map_err(serde::de::Error::custom)?;
        let first_player: Color = turn.parse().map_err(serde::de::Error::custom)?;

        let mut game = Game::with_options(board, first_player, max_moves);

        if moves_str.is_empty() {
            return Ok(game);
        }

        for move_str in moves_str.split(';') {
            let mv: Move = move_str.parse().map_err(serde::de::Error::custom)?;
            game.make_move(&mv)
                .map_err(|e| serde::de::Error::custom(format!("Invalid move {}: {}", mv, e)))?;
        }

        Ok(game)
    }
}
