//! Dense in-memory tile grid.

use glam::IVec3;
use hashbrown::HashMap;
use log::debug;

use crate::map::{BashOutcome, FieldKind, GameMap, TerrainFlag, VehicleAt};
use crate::traps::TrapId;
use crate::vehicle::VehicleId;

/// Ground types of the sandbox.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Terrain {
    /// Paved road.
    Pavement,
    /// Packed dirt.
    Dirt,
    /// Solid wall no vehicle can break.
    Wall,
    /// Wooden fence that gives way to a hard enough hit.
    Fence,
    /// Solid bedrock below ground level.
    Rock,
    /// Nothing to stand on.
    OpenAir,
    /// Water a vehicle can float in.
    DeepWater,
    /// Water a vehicle can drive through.
    ShallowWater,
    /// Railway track.
    Rail,
    /// High end of a ramp leading up a level.
    RampUp,
    /// Low end of a ramp leading down a level.
    RampDown,
}

impl Terrain {
    const fn move_cost(self) -> i32 {
        match self {
            Self::Wall | Self::Fence | Self::Rock => 0,
            Self::Pavement | Self::Dirt | Self::OpenAir | Self::Rail | Self::RampUp | Self::RampDown => 2,
            Self::ShallowWater => 5,
            Self::DeepWater => 8,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Pavement => "pavement",
            Self::Dirt => "dirt",
            Self::Wall => "concrete wall",
            Self::Fence => "wooden fence",
            Self::Rock => "solid rock",
            Self::OpenAir => "open air",
            Self::DeepWater => "deep water",
            Self::ShallowWater => "shallow water",
            Self::Rail => "railroad track",
            Self::RampUp => "upward ramp",
            Self::RampDown => "downward ramp",
        }
    }

    fn has_flag(self, flag: TerrainFlag) -> bool {
        match self {
            Self::Pavement => flag == TerrainFlag::Flat,
            Self::OpenAir => flag == TerrainFlag::NoFloor,
            Self::DeepWater => matches!(flag, TerrainFlag::DeepWater | TerrainFlag::Swimmable),
            Self::ShallowWater => flag == TerrainFlag::Swimmable,
            Self::Rail => matches!(flag, TerrainFlag::Rail | TerrainFlag::Flat),
            Self::RampUp => matches!(flag, TerrainFlag::RampUp | TerrainFlag::Flat),
            Self::RampDown => matches!(flag, TerrainFlag::RampDown | TerrainFlag::Flat),
            Self::Dirt | Self::Wall | Self::Fence | Self::Rock => false,
        }
    }

    /// `(resistance, strength)` for terrain that can be broken.
    const fn bash(self) -> Option<(i32, i32)> {
        match self {
            Self::Fence => Some((8, 40)),
            _ => None,
        }
    }

    const fn supports_above(self) -> bool {
        matches!(self, Self::Wall | Self::Rock)
    }
}

/// Bashable object standing on a tile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Furniture {
    /// Display name.
    pub name: String,
    /// Movement cost added to the terrain underneath.
    pub move_cost_mod: i32,
    /// Force needed to start damaging it.
    pub bash_resistance: i32,
    /// Force that always breaks it.
    pub bash_strength: i32,
    /// Extra flags.
    pub flags: Vec<TerrainFlag>,
}

impl Furniture {
    /// Furniture with the given bash values and a movement cost of 2.
    #[must_use]
    pub fn new(name: &str, bash_resistance: i32, bash_strength: i32) -> Self {
        Self {
            name: name.to_owned(),
            move_cost_mod: 2,
            bash_resistance,
            bash_strength,
            flags: Vec::new(),
        }
    }

    /// Add `flag` to the furniture.
    #[must_use]
    pub fn with_flag(mut self, flag: TerrainFlag) -> Self {
        self.flags.push(flag);
        self
    }
}

/// Field effect left on a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Field {
    /// Kind of field.
    pub kind: FieldKind,
    /// Strength.
    pub intensity: i32,
    /// Turns left.
    pub duration: u32,
}

/// Rectangular map spanning a range of z-levels.
///
/// Unset tiles default to [`Terrain::Pavement`] at z 0, open air above and
/// rock below. Bashing is deterministic: an obstacle breaks once the force
/// reaches its strength.
///
/// # Examples
/// ```
/// use glam::IVec3;
/// use trundle::map::GameMap;
/// use trundle::sandbox::{Terrain, TileMap};
///
/// let mut map = TileMap::new(10, 10);
/// map.set_terrain(IVec3::new(3, 3, 0), Terrain::Wall);
/// assert!(map.impassable(IVec3::new(3, 3, 0)));
/// assert!(!map.inbounds(IVec3::new(10, 0, 0)));
/// ```
#[derive(Clone, Debug)]
pub struct TileMap {
    width: i32,
    height: i32,
    min_z: i32,
    max_z: i32,
    terrain: HashMap<IVec3, Terrain>,
    furniture: HashMap<IVec3, Furniture>,
    fields: HashMap<IVec3, Vec<Field>>,
    traps: HashMap<IVec3, TrapId>,
    items: HashMap<IVec3, Vec<(String, u32)>>,
    explosions: Vec<(IVec3, i32, i32)>,
    occupancy: HashMap<IVec3, VehicleAt>,
    footprints: HashMap<VehicleId, Vec<IVec3>>,
}

impl TileMap {
    /// Single-level map of `width` by `height` tiles.
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        Self::with_levels(width, height, 0, 0)
    }

    /// Map covering z-levels `min_z..=max_z`.
    #[must_use]
    pub fn with_levels(width: i32, height: i32, min_z: i32, max_z: i32) -> Self {
        Self {
            width,
            height,
            min_z,
            max_z: max_z.max(min_z),
            terrain: HashMap::new(),
            furniture: HashMap::new(),
            fields: HashMap::new(),
            traps: HashMap::new(),
            items: HashMap::new(),
            explosions: Vec::new(),
            occupancy: HashMap::new(),
            footprints: HashMap::new(),
        }
    }

    /// Terrain at `p`.
    #[must_use]
    pub fn terrain(&self, p: IVec3) -> Terrain {
        if let Some(&terrain) = self.terrain.get(&p) {
            return terrain;
        }
        match p.z {
            0 => Terrain::Pavement,
            z if z > 0 => Terrain::OpenAir,
            _ => Terrain::Rock,
        }
    }

    /// Replace the terrain at `p`.
    pub fn set_terrain(&mut self, p: IVec3, terrain: Terrain) {
        self.terrain.insert(p, terrain);
    }

    /// Fill the box spanned by `from` and `to` (inclusive) with `terrain`.
    pub fn fill(&mut self, from: IVec3, to: IVec3, terrain: Terrain) {
        let lo = from.min(to);
        let hi = from.max(to);
        for z in lo.z..=hi.z {
            for y in lo.y..=hi.y {
                for x in lo.x..=hi.x {
                    self.terrain.insert(IVec3::new(x, y, z), terrain);
                }
            }
        }
    }

    /// Furniture at `p`.
    #[must_use]
    pub fn furniture(&self, p: IVec3) -> Option<&Furniture> {
        self.furniture.get(&p)
    }

    /// Place furniture at `p`.
    pub fn set_furniture(&mut self, p: IVec3, furniture: Furniture) {
        self.furniture.insert(p, furniture);
    }

    /// Fields at `p`.
    #[must_use]
    pub fn fields_at(&self, p: IVec3) -> &[Field] {
        self.fields.get(&p).map_or(&[], Vec::as_slice)
    }

    /// Items lying at `p`.
    #[must_use]
    pub fn items_at(&self, p: IVec3) -> &[(String, u32)] {
        self.items.get(&p).map_or(&[], Vec::as_slice)
    }

    /// Explosions so far as `(position, power, shrapnel)`.
    #[must_use]
    pub fn explosions(&self) -> &[(IVec3, i32, i32)] {
        &self.explosions
    }

    /// Tiles registered for `vehicle`.
    #[must_use]
    pub fn footprint(&self, vehicle: VehicleId) -> &[IVec3] {
        self.footprints.get(&vehicle).map_or(&[], Vec::as_slice)
    }

    /// Draw level `z` as text, one row per line.
    #[must_use]
    pub fn render(&self, z: i32) -> String {
        let mut out = String::new();
        for y in 0..self.height {
            for x in 0..self.width {
                let p = IVec3::new(x, y, z);
                let glyph = if self.occupancy.contains_key(&p) {
                    '#'
                } else if self.furniture.contains_key(&p) {
                    '&'
                } else {
                    match self.terrain(p) {
                        Terrain::Pavement | Terrain::Dirt => '.',
                        Terrain::Wall | Terrain::Rock => 'X',
                        Terrain::Fence => '|',
                        Terrain::OpenAir => ' ',
                        Terrain::DeepWater | Terrain::ShallowWater => '~',
                        Terrain::Rail => '=',
                        Terrain::RampUp => '<',
                        Terrain::RampDown => '>',
                    }
                };
                out.push(glyph);
            }
            out.push('\n');
        }
        out
    }

    fn in_plane(&self, p: IVec3) -> bool {
        (0..self.width).contains(&p.x) && (0..self.height).contains(&p.y)
    }
}

impl GameMap for TileMap {
    fn inbounds(&self, p: IVec3) -> bool {
        self.in_plane(p) && self.inbounds_z(p.z)
    }

    fn has_zlevels(&self) -> bool {
        self.max_z > self.min_z
    }

    fn inbounds_z(&self, z: i32) -> bool {
        (self.min_z..=self.max_z).contains(&z)
    }

    fn move_cost(&self, p: IVec3) -> i32 {
        if !self.inbounds(p) {
            return 0;
        }
        let base = self.terrain(p).move_cost();
        if base == 0 {
            return 0;
        }
        base + self.furniture.get(&p).map_or(0, |f| f.move_cost_mod)
    }

    fn bash_resistance(&self, p: IVec3, floor: bool) -> i32 {
        if floor {
            return 0;
        }
        match self.furniture.get(&p) {
            Some(f) => f.bash_resistance,
            None => self.terrain(p).bash().map_or(0, |(resistance, _)| resistance),
        }
    }

    fn bash_strength(&self, p: IVec3, floor: bool) -> i32 {
        if floor {
            return 0;
        }
        match self.furniture.get(&p) {
            Some(f) => f.bash_strength,
            None => self.terrain(p).bash().map_or(0, |(_, strength)| strength),
        }
    }

    fn is_bashable(&self, p: IVec3, floor: bool) -> bool {
        !floor && (self.furniture.contains_key(&p) || self.terrain(p).bash().is_some())
    }

    fn impassable(&self, p: IVec3) -> bool {
        self.move_cost(p) == 0
    }

    fn has_flag(&self, flag: TerrainFlag, p: IVec3) -> bool {
        self.terrain(p).has_flag(flag) || self.furniture.get(&p).is_some_and(|f| f.flags.contains(&flag))
    }

    fn supports_above(&self, p: IVec3) -> bool {
        self.terrain(p).supports_above()
    }

    fn name_at(&self, p: IVec3) -> String {
        self.furniture
            .get(&p)
            .map_or_else(|| self.terrain(p).name().to_owned(), |f| f.name.clone())
    }

    fn veh_at(&self, p: IVec3) -> Option<VehicleAt> {
        self.occupancy.get(&p).copied()
    }

    fn bash(&mut self, p: IVec3, force: f64) -> BashOutcome {
        let strength = f64::from(self.bash_strength(p, false));
        if !self.is_bashable(p, false) || force < strength {
            return BashOutcome { success: false };
        }
        if let Some(f) = self.furniture.remove(&p) {
            debug!("{} at {p} smashed", f.name);
        } else {
            debug!("{} at {p} smashed", self.terrain(p).name());
            self.terrain.insert(p, Terrain::Dirt);
        }
        BashOutcome { success: true }
    }

    fn add_field(&mut self, p: IVec3, kind: FieldKind, intensity: i32, duration: u32) {
        let fields = self.fields.entry(p).or_default();
        match fields.iter_mut().find(|field| field.kind == kind) {
            Some(field) => {
                field.intensity = field.intensity.max(intensity);
                field.duration = field.duration.max(duration);
            }
            None => fields.push(Field {
                kind,
                intensity,
                duration,
            }),
        }
    }

    fn trap_at(&self, p: IVec3) -> TrapId {
        self.traps.get(&p).copied().unwrap_or(TrapId::NULL)
    }

    fn set_trap(&mut self, p: IVec3, trap: TrapId) {
        if trap.is_null() {
            self.traps.remove(&p);
        } else {
            self.traps.insert(p, trap);
        }
    }

    fn remove_trap(&mut self, p: IVec3) {
        self.traps.remove(&p);
    }

    fn spawn_item(&mut self, p: IVec3, item: &str, count: u32) {
        let items = self.items.entry(p).or_default();
        match items.iter_mut().find(|(name, _)| name == item) {
            Some((_, existing)) => *existing += count,
            None => items.push((item.to_owned(), count)),
        }
    }

    fn explosion(&mut self, p: IVec3, power: i32, shrapnel: i32) {
        debug!("explosion of power {power} at {p}");
        self.explosions.push((p, power, shrapnel));
    }

    fn set_vehicle_footprint(&mut self, vehicle: VehicleId, parts: &[(IVec3, usize)]) {
        self.clear_vehicle_footprint(vehicle);
        let mut tiles = Vec::with_capacity(parts.len());
        for &(p, part) in parts {
            if self.occupancy.contains_key(&p) {
                continue;
            }
            self.occupancy.insert(p, VehicleAt { vehicle, part });
            tiles.push(p);
        }
        self.footprints.insert(vehicle, tiles);
    }

    fn clear_vehicle_footprint(&mut self, vehicle: VehicleId) {
        for p in self.footprints.remove(&vehicle).unwrap_or_default() {
            if self.occupancy.get(&p).is_some_and(|at| at.vehicle == vehicle) {
                self.occupancy.remove(&p);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, Terrain::Pavement)]
    #[case(1, Terrain::OpenAir)]
    #[case(-1, Terrain::Rock)]
    fn default_terrain_depends_on_level(#[case] z: i32, #[case] expected: Terrain) {
        let map = TileMap::with_levels(4, 4, -1, 1);
        assert_eq!(map.terrain(IVec3::new(1, 1, z)), expected);
    }

    #[test]
    fn furniture_breaks_at_its_strength() {
        let mut map = TileMap::new(4, 4);
        let p = IVec3::new(2, 2, 0);
        map.set_furniture(p, Furniture::new("bench", 10, 50));
        assert_eq!(map.move_cost(p), 4);
        assert!(!map.bash(p, 49.0).success);
        assert!(map.bash(p, 50.0).success);
        assert!(map.furniture(p).is_none());
        assert_eq!(map.move_cost(p), 2);
    }

    #[test]
    fn walls_cannot_be_bashed() {
        let mut map = TileMap::new(4, 4);
        let p = IVec3::new(1, 1, 0);
        map.set_terrain(p, Terrain::Wall);
        assert!(!map.is_bashable(p, false));
        assert!(!map.bash(p, 1.0e6).success);
        assert!(map.impassable(p));
    }

    #[test]
    fn footprints_do_not_steal_occupied_tiles() {
        let mut map = TileMap::new(4, 4);
        let p = IVec3::new(1, 1, 0);
        map.set_vehicle_footprint(VehicleId(1), &[(p, 0)]);
        map.set_vehicle_footprint(VehicleId(2), &[(p, 3), (IVec3::new(2, 1, 0), 4)]);
        assert_eq!(map.veh_at(p).map(|at| at.vehicle), Some(VehicleId(1)));
        map.clear_vehicle_footprint(VehicleId(1));
        assert!(map.veh_at(p).is_none());
        assert_eq!(map.footprint(VehicleId(2)), &[IVec3::new(2, 1, 0)]);
    }

    #[test]
    fn fields_merge_by_kind() {
        let mut map = TileMap::new(4, 4);
        let p = IVec3::new(0, 0, 0);
        map.add_field(p, FieldKind::Smoke, 1, 5);
        map.add_field(p, FieldKind::Smoke, 3, 2);
        assert_eq!(
            map.fields_at(p),
            &[Field {
                kind: FieldKind::Smoke,
                intensity: 3,
                duration: 5
            }]
        );
    }
}
