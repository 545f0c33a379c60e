use crate::world::WorldMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Facing {
    Up,
    Down,
    Left,
    Right,
}

impl Facing {
    pub const ALL: [Facing; 4] = [Facing::Up, Facing::Down, Facing::Left, Facing::Right];

    pub const fn delta(self) -> (i64, i64) {
        match self {
            Facing::Up => (0, -1),
            Facing::Down => (0, 1),
            Facing::Left => (-1, 0),
            Facing::Right => (1, 0),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Facing::Up => "up",
            Facing::Down => "down",
            Facing::Left => "left",
            Facing::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Female,
    Male,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorKind {
    Player,
    Npc { gender: Gender },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridPos {
    pub x: u32,
    pub y: u32,
}

/// Pixel position in unwrapped world space. May be negative or exceed the
/// world extent while an actor is mid-step across a world edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelPos {
    pub x: i64,
    pub y: i64,
}

/// A moving entity with a discrete grid cell plus a visual lag toward it.
///
/// The actor reached `grid` by stepping once in `facing`; `step_remaining`
/// is the fraction of that step not yet shown on screen (1.0 right after the
/// move, 0.0 when settled).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Actor {
    pub kind: ActorKind,
    pub grid: GridPos,
    pub facing: Facing,
    pub step_remaining: f32,
}

impl Actor {
    pub fn new(kind: ActorKind, grid: GridPos, facing: Facing) -> Self {
        Self {
            kind,
            grid,
            facing,
            step_remaining: 0.0,
        }
    }

    pub fn location(&self, tile_size: u32) -> PixelPos {
        let tile = i64::from(tile_size);
        let lag_px = (self.step_remaining.clamp(0.0, 1.0) * tile_size as f32).round() as i64;
        let (dx, dy) = self.facing.delta();
        PixelPos {
            x: i64::from(self.grid.x) * tile - dx * lag_px,
            y: i64::from(self.grid.y) * tile - dy * lag_px,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.step_remaining <= 0.0
    }

    /// Turns toward `facing` and moves one cell, wrapping at world edges.
    pub fn step(&mut self, facing: Facing, world: &WorldMap) {
        let (dx, dy) = facing.delta();
        self.facing = facing;
        self.grid = GridPos {
            x: world.wrap_x(i64::from(self.grid.x) + dx),
            y: world.wrap_y(i64::from(self.grid.y) + dy),
        };
        self.step_remaining = 1.0;
    }

    pub fn advance(&mut self, fraction: f32) {
        self.step_remaining = (self.step_remaining - fraction.max(0.0)).max(0.0);
    }
}
