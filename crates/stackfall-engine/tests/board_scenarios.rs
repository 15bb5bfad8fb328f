use stackfall_engine::{
    Board, BoardConfig, Grid, PieceProvider, PieceSeed, Scene, SceneEvent, Shape, ShapeKind,
    TetrominoCatalog, TickOutcome,
};

fn single_shape_board(rows: &[&str]) -> Board<Vec<Shape>> {
    let shapes = vec![Shape::from_rows(ShapeKind::I, rows).unwrap()];
    Board::with_provider(BoardConfig::default(), shapes, PieceSeed::from_u128(0)).unwrap()
}

fn tick_until_lock<P: PieceProvider>(
    board: &mut Board<P>,
    scene: &mut impl Scene,
) -> (usize, TickOutcome) {
    for tick in 1..=10_000 {
        let outcome = board.update(scene);
        if !outcome.is_fell() {
            return (tick, outcome);
        }
    }
    panic!("piece never locked");
}

fn assert_grid_in_bounds<P>(board: &Board<P>) {
    let grid = board.grid();
    for (row, col, _) in grid.blocks() {
        assert!(row < grid.height() && col < grid.width(), "block at ({row}, {col})");
    }
}

#[test]
fn horizontal_bar_locks_on_floor_centred() {
    let mut board = single_shape_board(&["####"]);
    let (_, outcome) = tick_until_lock(&mut board, &mut ());

    assert_eq!(outcome, TickOutcome::Locked { cleared_rows: 0 });
    assert!(!board.is_game_over());
    let occupied: Vec<_> = board.grid().blocks().map(|(row, col, _)| (row, col)).collect();
    assert_eq!(occupied, [(15, 3), (15, 4), (15, 5), (15, 6)]);
}

#[test]
fn filling_last_gap_clears_row_and_drops_row_above() {
    let mut board = single_shape_board(&["#"]);
    let mut grid = Grid::new(10, 16);
    let art = Grid::from_ascii(10, 2, "....T..S..\n.OOOOOOOOO");
    for (row, col, block) in art.blocks() {
        grid.set(row + 14, col, block);
    }
    board.replace_grid(grid).unwrap();

    let mut events = Vec::new();
    board.spawn_next(&mut events).unwrap();
    for _ in 0..5 {
        board.move_left().unwrap();
    }
    assert!(board.move_left().is_err());
    events.clear();

    let (_, outcome) = tick_until_lock(&mut board, &mut events);
    assert_eq!(outcome, TickOutcome::Locked { cleared_rows: 1 });
    assert_eq!(
        board.grid().to_string().lines().collect::<Vec<_>>()[14..],
        ["..........", "....T..S.."]
    );
    assert_eq!(board.stats().cleared_rows(), 1);

    assert!(events[0].is_block_added());
    assert!(events[1].is_piece_removed());
    assert_eq!(events[2..12].iter().filter(|e| e.is_block_removed()).count(), 10);
    let moved: Vec<_> = events[12..]
        .iter()
        .map(|event| match event {
            SceneEvent::BlockMoved { block, row, col, center } => {
                assert_eq!(*center, board.cell_position(*row, *col));
                (block.kind(), *row, *col)
            }
            other => panic!("unexpected {other:?}"),
        })
        .collect();
    assert_eq!(moved, [(ShapeKind::T, 15, 4), (ShapeKind::S, 15, 7)]);
}

#[test]
fn locking_adds_one_block_per_filled_cell() {
    let catalog = TetrominoCatalog::new();
    for kind in ShapeKind::ALL {
        let mut board = Board::with_seed(BoardConfig::default(), PieceSeed::from_u128(3)).unwrap();
        let before = board.grid().occupied_count();
        let piece = board.spawn(catalog.shape(kind), &mut ()).unwrap().clone();
        let filled = piece.mask().filled_count();

        let bottom_y = board.bottom_y();
        let cleared = board.occupy(piece, bottom_y, &mut ());
        assert_eq!(cleared, 0);
        assert_eq!(board.grid().occupied_count(), before + filled, "{kind}");
    }
}

#[test]
fn clearing_one_full_row_shifts_rows_above() {
    let mut board = single_shape_board(&["#"]);
    let grid = Grid::from_ascii(
        10,
        16,
        "
        .J........
        ..L..T....
        IIIIIIIIII
        S.S.S.S.S.
        ",
    );
    let before: Vec<_> = grid.rows().map(<[_]>::to_vec).collect();
    board.replace_grid(grid.clone()).unwrap();

    assert_eq!(board.clear_full_rows(&mut ()), 1);
    let after = board.grid();
    assert_eq!(after.occupied_count(), grid.occupied_count() - 10);
    for row in 0..14 {
        assert_eq!(after.row(row + 1), &before[row][..], "row {row}");
    }
    assert!(after.is_row_empty(0));
    assert_eq!(after.row(15), &before[15][..]);
}

#[test]
fn active_piece_never_overlaps_locked_blocks() {
    for seed in 0..8 {
        let mut board =
            Board::with_seed(BoardConfig::default(), PieceSeed::from_u128(seed)).unwrap();
        for tick in 0..20_000_usize {
            let command = match tick % 11 {
                0 => Some(board.move_left()),
                3 => Some(board.rotate()),
                6 | 8 => Some(board.move_right()),
                _ => None,
            };
            if let Some(Ok(())) = command {
                let piece = board.active_piece().unwrap();
                assert!(!board.detect_collision(piece, 0.0, 0.0), "seed {seed} tick {tick}");
            }

            let outcome = board.update(&mut ());
            if outcome.is_fell() {
                let piece = board.active_piece().unwrap();
                assert!(!board.detect_collision(piece, 0.0, 0.0), "seed {seed} tick {tick}");
            }
            assert_grid_in_bounds(&board);
            if board.is_game_over() {
                break;
            }
        }
    }
}

#[test]
fn soft_drop_never_takes_longer() {
    let obstacles = Grid::from_ascii(
        10,
        16,
        "
        ....ZZ....
        ..........
        ...TTT....
        ..........
        .....J....
        ",
    );
    for seed in 0..16 {
        let seed = PieceSeed::from_u128(seed);
        let mut slow = Board::with_seed(BoardConfig::default(), seed).unwrap();
        slow.replace_grid(obstacles.clone()).unwrap();
        let mut fast = slow.clone();

        fast.set_speed_up(true);
        let (slow_ticks, _) = tick_until_lock(&mut slow, &mut ());
        let (fast_ticks, _) = tick_until_lock(&mut fast, &mut ());
        assert!(fast_ticks <= slow_ticks, "{fast_ticks} > {slow_ticks}");
    }
}

#[test]
fn locking_at_spawn_height_ends_the_game() {
    let mut board = single_shape_board(&["####"]);
    let mut grid = Grid::new(10, 16);
    for (row, col, block) in Grid::from_ascii(10, 1, "...IIII...").blocks() {
        grid.set(row + 1, col, block);
    }
    board.replace_grid(grid).unwrap();

    assert_eq!(board.update(&mut ()), TickOutcome::ToppedOut { cleared_rows: 0 });
    assert!(board.is_game_over());
    assert_eq!(board.update(&mut ()), TickOutcome::Idle);
}

#[test]
fn locking_one_cell_below_spawn_height_continues() {
    let mut board = single_shape_board(&["####"]);
    let mut grid = Grid::new(10, 16);
    for (row, col, block) in Grid::from_ascii(10, 1, "...IIII...").blocks() {
        grid.set(row + 2, col, block);
    }
    board.replace_grid(grid).unwrap();

    let (_, outcome) = tick_until_lock(&mut board, &mut ());
    assert_eq!(outcome, TickOutcome::Locked { cleared_rows: 0 });
    assert!(!board.is_game_over());
    assert!(board.grid().is_occupied(1, 3));
    assert!(!board.grid().is_occupied(0, 3));
}

#[test]
fn stacking_without_input_tops_out() {
    let mut board = Board::with_seed(BoardConfig::default(), PieceSeed::from_u128(11)).unwrap();
    let mut locked = 0;
    loop {
        match tick_until_lock(&mut board, &mut ()) {
            (_, TickOutcome::Locked { .. }) => locked += 1,
            (_, TickOutcome::ToppedOut { .. }) => break,
            (_, outcome) => panic!("unexpected {outcome:?}"),
        }
        assert!(locked < 200, "board never topped out");
    }
    assert!(board.is_game_over());
    assert!(!board.grid().is_row_empty(0));
    assert_eq!(board.stats().locked_pieces(), locked + 1);
    assert!(board.spawn_next(&mut ()).is_err());
}
