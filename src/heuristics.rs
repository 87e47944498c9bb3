use crate::engine::{Board, CostModel, BLANK, BOARD_SIZE, MAX_TILE};

/// Computes the tile-weighted Manhattan distance between `state` and `goal`.
///
/// For each non-blank tile, the Manhattan distance between its position in
/// `state` and its position in `goal` is multiplied by the tile's own value,
/// and the products are summed. Because a move costs the value of the moved
/// tile and changes that tile's distance by exactly one, this never
/// overestimates the remaining cost.
///
/// # Examples
/// ```
/// use expense_puzzle::engine::Board;
/// use expense_puzzle::heuristics::heuristic;
///
/// let goal = Board::solved();
/// assert_eq!(heuristic(&goal, &goal), 0);
///
/// let start = Board::from_grid([[1, 2, 3], [4, 0, 6], [7, 5, 8]]).unwrap();
/// // Tile 5 is one row away, tile 8 one column away.
/// assert_eq!(heuristic(&start, &goal), 5 + 8);
/// ```
pub fn heuristic(state: &Board, goal: &Board) -> u32 {
    heuristic_for(state, goal, CostModel::TileValue)
}

/// Manhattan distance weighted by the step cost of each tile under `cost_model`.
///
/// With `CostModel::Unit` this is the plain Manhattan distance.
pub fn heuristic_for(state: &Board, goal: &Board, cost_model: CostModel) -> u32 {
    let goal_positions = positions(goal);
    let mut cost = 0;
    for r in 0..BOARD_SIZE {
        for c in 0..BOARD_SIZE {
            let tile = state.get_tile(r, c);
            if tile == BLANK {
                continue;
            }
            let (gr, gc) = goal_positions[tile as usize];
            let distance = (r.abs_diff(gr) + c.abs_diff(gc)) as u32;
            cost += cost_model.step_cost(tile) * distance;
        }
    }
    cost
}

/// Goal position of every tile, indexed by tile value.
fn positions(board: &Board) -> [(usize, usize); MAX_TILE as usize + 1] {
    let mut table = [(0, 0); MAX_TILE as usize + 1];
    for r in 0..BOARD_SIZE {
        for c in 0..BOARD_SIZE {
            table[board.get_tile(r, c) as usize] = (r, c);
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Direction;

    #[test]
    fn test_heuristic_of_goal_is_zero() {
        let boards = [
            Board::solved(),
            Board::from_grid([[1, 2, 3], [4, 0, 6], [7, 5, 8]]).unwrap(),
            Board::from_grid([[8, 7, 6], [5, 4, 3], [2, 1, 0]]).unwrap(),
        ];
        for b in &boards {
            assert_eq!(heuristic(b, b), 0);
            assert_eq!(heuristic_for(b, b, CostModel::Unit), 0);
        }
    }

    #[test]
    fn test_heuristic_weights_by_tile_value() {
        let goal = Board::solved();
        // 8 and 0 swapped: tile 8 is one column away.
        let state = Board::from_grid([[1, 2, 3], [4, 5, 6], [7, 0, 8]]).unwrap();
        assert_eq!(heuristic(&state, &goal), 8);
        assert_eq!(heuristic_for(&state, &goal, CostModel::Unit), 1);
    }

    #[test]
    fn test_heuristic_against_non_standard_goal() {
        let goal = Board::from_grid([[0, 1, 2], [3, 4, 5], [6, 7, 8]]).unwrap();
        let state = Board::from_grid([[1, 0, 2], [3, 4, 5], [6, 7, 8]]).unwrap();
        assert_eq!(heuristic(&state, &goal), 1);
    }

    #[test]
    fn test_one_move_changes_heuristic_by_at_most_step_cost() {
        let goal = Board::solved();
        let mut frontier = vec![Board::scrambled(&goal, 30, 3), Board::scrambled(&goal, 12, 99)];
        frontier.push(Board::from_grid([[1, 2, 3], [4, 0, 6], [7, 5, 8]]).unwrap());
        for state in frontier {
            let h = heuristic(&state, &goal);
            for t in state.successors(CostModel::TileValue) {
                let h2 = heuristic(&t.board, &goal);
                assert!(
                    h.abs_diff(h2) <= t.step_cost,
                    "|{} - {}| exceeds cost {} for {}",
                    h,
                    h2,
                    t.step_cost,
                    t.action
                );
            }
        }
    }

    #[test]
    fn test_heuristic_decreases_when_moving_towards_goal() {
        let goal = Board::solved();
        let state = Board::from_grid([[1, 2, 3], [4, 5, 6], [7, 0, 8]]).unwrap();
        let next = state.apply_move((2, 1), Direction::Right).unwrap();
        assert_eq!(next, goal);
        assert!(heuristic(&next, &goal) < heuristic(&state, &goal));
    }
}
