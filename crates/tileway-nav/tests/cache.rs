use tileway_nav::{Cell, Grid, MovementPolicy, PathCache, PathKey, Pathfinder};

fn corridor_grid() -> Grid {
    let mut grid = Grid::new(10, 10);
    for y in 0..9 {
        grid.set_walkable(5, y, false);
    }
    grid
}

#[test]
fn cache_is_transparent_for_path_values() {
    let policy = MovementPolicy::orthogonal();
    let mut plain = Pathfinder::new(corridor_grid(), policy);
    let mut cached = Pathfinder::with_cache(corridor_grid(), policy, 16);

    for _ in 0..3 {
        let a = plain.find_path(0, 0, 9, 9, false);
        let b = cached.find_path(0, 0, 9, 9, false);
        assert!(a.found && b.found);
        assert_eq!(a.path, b.path);
        assert_eq!(a.cost, b.cost);
    }
}

#[test]
fn smoothed_and_raw_lookups_do_not_collide() {
    let mut pf = Pathfinder::with_cache(corridor_grid(), MovementPolicy::orthogonal(), 16);
    let raw = pf.find_path(0, 0, 9, 9, false);
    let smoothed = pf.find_path(0, 0, 9, 9, true);
    assert!(raw.found && smoothed.found);
    assert!(smoothed.len() < raw.len());

    // Repeat lookups still return the variant that was asked for.
    assert_eq!(pf.find_path(0, 0, 9, 9, false).path, raw.path);
    assert_eq!(pf.find_path(0, 0, 9, 9, true).path, smoothed.path);
}

#[test]
fn grid_mutation_invalidates_cached_entries() {
    let mut pf = Pathfinder::with_cache(Grid::new(10, 10), MovementPolicy::orthogonal(), 16);
    let before = pf.find_path(0, 5, 9, 5, false);
    assert!(before.found);
    assert_eq!(before.len(), 10);

    // Wall splits the row the cached path ran along.
    for y in 0..10 {
        if y != 9 {
            pf.grid_mut().set_walkable(5, y, false);
        }
    }

    let after = pf.find_path(0, 5, 9, 5, false);
    assert!(after.found);
    assert!(after.len() > before.len(), "stale straight path must not be served");
    assert!(after.path.contains(&Cell::new(5, 9)));
}

#[test]
fn policy_change_invalidates_cached_entries() {
    let mut pf = Pathfinder::with_cache(Grid::new(10, 10), MovementPolicy::orthogonal(), 16);
    let ortho = pf.find_path(0, 0, 9, 9, false);
    assert_eq!(ortho.len(), 19);

    pf.set_policy(MovementPolicy::diagonal());
    let diag = pf.find_path(0, 0, 9, 9, false);
    assert_eq!(diag.len(), 10);
}

#[test]
fn set_grid_bumps_version_past_the_old_grid() {
    let mut pf = Pathfinder::with_cache(Grid::new(10, 10), MovementPolicy::orthogonal(), 16);
    // Accumulate version on the first grid.
    for x in 0..5 {
        pf.grid_mut().set_walkable(x, 1, false);
    }
    let old_version = pf.grid().version();
    let blocked = pf.find_path(0, 0, 0, 2, false);
    assert!(blocked.found);

    // Fresh grid starts at version 0 internally; the swap must still move
    // past the old version so keys cannot collide.
    pf.set_grid(Grid::new(10, 10));
    assert!(pf.grid().version() > old_version);

    let open = pf.find_path(0, 0, 0, 2, false);
    assert!(open.found);
    assert_eq!(open.len(), 3, "path must reflect the new, open grid");
}

#[test]
fn lru_evicts_the_least_recently_used_entry() {
    let grid = Grid::new(4, 4);
    let policy = MovementPolicy::orthogonal();
    let mut cache = PathCache::new(2);

    let key = |x: i32| PathKey {
        start: Cell::new(0, 0),
        goal: Cell::new(x, 0),
        policy,
        grid_version: grid.version(),
        smoothed: false,
    };
    let result = tileway_nav::search(&grid, policy, Cell::new(0, 0), Cell::new(1, 0));

    cache.store(key(1), result.clone());
    cache.store(key(2), result.clone());
    assert_eq!(cache.len(), 2);

    // Touch key(1) so key(2) becomes the eviction candidate.
    assert!(cache.lookup(&key(1)).is_some());
    cache.store(key(3), result.clone());

    assert_eq!(cache.len(), 2);
    assert!(cache.lookup(&key(1)).is_some());
    assert!(cache.lookup(&key(2)).is_none());
    assert!(cache.lookup(&key(3)).is_some());
}

#[test]
fn store_purges_entries_from_older_grid_versions() {
    let mut grid = Grid::new(4, 4);
    let policy = MovementPolicy::orthogonal();
    let mut cache = PathCache::new(8);
    let result = tileway_nav::search(&grid, policy, Cell::new(0, 0), Cell::new(1, 0));

    let old_key = PathKey {
        start: Cell::new(0, 0),
        goal: Cell::new(1, 0),
        policy,
        grid_version: grid.version(),
        smoothed: false,
    };
    cache.store(old_key, result.clone());

    grid.set_walkable(3, 3, false);
    let new_key = PathKey {
        grid_version: grid.version(),
        ..old_key
    };
    cache.store(new_key, result);

    assert!(cache.lookup(&old_key).is_none());
    assert!(cache.lookup(&new_key).is_some());
    assert_eq!(cache.len(), 1);
}
