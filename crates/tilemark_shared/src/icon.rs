//! # Icon Catalog
//!
//! Markers are drawn with an icon supplied by an [`IconProvider`]. The
//! provider's [`IconKey`] is the identity used for marker equality and for
//! the per-category visibility filter, so two markers drawn with the same
//! icon at the same spot are the same marker.
//!
//! Built-in providers:
//! - [`EntityKind`]: mobs and players found in chunk entity data
//! - [`BlockEntityKind`]: chests, signs, spawners found in block-entity data
//! - [`CustomIcon`]: icons picked by name for user-placed markers
//! - [`NamedIcon`]: any provider shown under a different display name

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Stable identity of an icon.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IconKey(Cow<'static, str>);

impl IconKey {
    /// Key for a compile-time icon.
    #[inline]
    #[must_use]
    pub const fn from_static(key: &'static str) -> Self {
        Self(Cow::Borrowed(key))
    }

    /// Key built at runtime.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(Cow::Owned(key.into()))
    }

    /// The key as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IconKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Broad grouping of icons, used to pick filter defaults.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IconCategory {
    /// Entity (mob, player, vehicle).
    Entity,
    /// Block entity (chest, sign, spawner).
    BlockEntity,
    /// User-chosen icon.
    Custom,
}

/// Supplies the bitmap identity and label of a marker.
pub trait IconProvider: Send + Sync + fmt::Debug {
    /// Stable identity key.
    fn key(&self) -> &IconKey;

    /// Human readable name.
    fn display_name(&self) -> &str;

    /// Category of the icon.
    fn category(&self) -> IconCategory {
        IconCategory::Custom
    }
}

/// An entity type with a sprite on the entity sheet.
#[derive(Clone, Debug)]
pub struct EntityKind {
    /// Numeric entity id in the save format.
    pub id: u32,
    /// Icon key.
    pub key: IconKey,
    /// Display name.
    pub name: &'static str,
    /// Slot on the entity sprite sheet, `None` for entities drawn without a sprite.
    pub sheet_slot: Option<u16>,
}

impl EntityKind {
    /// Ids at or above this value are placeholders without real art.
    pub const PLACEHOLDER_ID_START: u32 = 900;

    const fn new(id: u32, key: &'static str, name: &'static str, sheet_slot: Option<u16>) -> Self {
        Self {
            id,
            key: IconKey::from_static(key),
            name,
            sheet_slot,
        }
    }

    /// The local / remote player entity.
    pub const PLAYER: Self = Self::new(63, "entity.player", "Player", Some(63));

    /// Filter default: visible, unless the kind has nothing to draw.
    ///
    /// Kinds without a sprite or with a placeholder id get no filter entry at all.
    #[must_use]
    pub fn filter_default(&self) -> Option<bool> {
        if self.sheet_slot.is_none() || self.id >= Self::PLACEHOLDER_ID_START {
            None
        } else {
            Some(true)
        }
    }
}

impl IconProvider for EntityKind {
    fn key(&self) -> &IconKey {
        &self.key
    }

    fn display_name(&self) -> &str {
        self.name
    }

    fn category(&self) -> IconCategory {
        IconCategory::Entity
    }
}

/// A block-entity type.
#[derive(Clone, Debug)]
pub struct BlockEntityKind {
    /// Icon key.
    pub key: IconKey,
    /// Display name.
    pub name: &'static str,
}

impl BlockEntityKind {
    const fn new(key: &'static str, name: &'static str) -> Self {
        Self {
            key: IconKey::from_static(key),
            name,
        }
    }

    /// Filter default: block entities are hidden until enabled.
    #[must_use]
    pub fn filter_default(&self) -> Option<bool> {
        Some(false)
    }
}

impl IconProvider for BlockEntityKind {
    fn key(&self) -> &IconKey {
        &self.key
    }

    fn display_name(&self) -> &str {
        self.name
    }

    fn category(&self) -> IconCategory {
        IconCategory::BlockEntity
    }
}

/// Icon chosen by name for a user-created marker.
#[derive(Clone, Debug)]
pub struct CustomIcon {
    key: IconKey,
    name: String,
}

impl CustomIcon {
    /// Icon for the world spawn marker.
    #[must_use]
    pub fn spawn() -> Self {
        Self {
            key: IconKey::from_static("custom.spawn_marker"),
            name: "Spawn".to_string(),
        }
    }

    /// Icon for a user marker, looked up by icon name (e.g. `blue_marker`).
    #[must_use]
    pub fn named(icon_name: &str, display_name: impl Into<String>) -> Self {
        Self {
            key: IconKey::new(format!("custom.{icon_name}")),
            name: display_name.into(),
        }
    }
}

impl IconProvider for CustomIcon {
    fn key(&self) -> &IconKey {
        &self.key
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

/// Shows another provider under a custom display name.
///
/// The key is the wrapped provider's key, so filtering still applies by category.
#[derive(Clone, Debug)]
pub struct NamedIcon {
    inner: Arc<dyn IconProvider>,
    name: String,
}

impl NamedIcon {
    /// Wraps `inner` with a new display name.
    #[must_use]
    pub fn new(inner: Arc<dyn IconProvider>, name: impl Into<String>) -> Self {
        Self {
            inner,
            name: name.into(),
        }
    }
}

impl IconProvider for NamedIcon {
    fn key(&self) -> &IconKey {
        self.inner.key()
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> IconCategory {
        self.inner.category()
    }
}

const ENTITY_KINDS: &[EntityKind] = &[
    EntityKind::new(10, "entity.chicken", "Chicken", Some(0)),
    EntityKind::new(11, "entity.cow", "Cow", Some(1)),
    EntityKind::new(12, "entity.pig", "Pig", Some(2)),
    EntityKind::new(13, "entity.sheep", "Sheep", Some(3)),
    EntityKind::new(14, "entity.wolf", "Wolf", Some(4)),
    EntityKind::new(15, "entity.villager", "Villager", Some(5)),
    EntityKind::new(16, "entity.mooshroom", "Mooshroom", Some(6)),
    EntityKind::new(17, "entity.squid", "Squid", Some(7)),
    EntityKind::new(18, "entity.rabbit", "Rabbit", Some(8)),
    EntityKind::new(19, "entity.bat", "Bat", Some(9)),
    EntityKind::new(20, "entity.iron_golem", "Iron Golem", Some(10)),
    EntityKind::new(21, "entity.snow_golem", "Snow Golem", Some(11)),
    EntityKind::new(22, "entity.ocelot", "Ocelot", Some(12)),
    EntityKind::new(23, "entity.horse", "Horse", Some(13)),
    EntityKind::new(32, "entity.zombie", "Zombie", Some(20)),
    EntityKind::new(33, "entity.creeper", "Creeper", Some(21)),
    EntityKind::new(34, "entity.skeleton", "Skeleton", Some(22)),
    EntityKind::new(35, "entity.spider", "Spider", Some(23)),
    EntityKind::new(36, "entity.zombie_pigman", "Zombie Pigman", Some(24)),
    EntityKind::new(37, "entity.slime", "Slime", Some(25)),
    EntityKind::new(38, "entity.enderman", "Enderman", Some(26)),
    EntityKind::new(39, "entity.silverfish", "Silverfish", Some(27)),
    EntityKind::new(40, "entity.cave_spider", "Cave Spider", Some(28)),
    EntityKind::new(41, "entity.ghast", "Ghast", Some(29)),
    EntityKind::new(42, "entity.magma_cube", "Magma Cube", Some(30)),
    EntityKind::new(43, "entity.blaze", "Blaze", Some(31)),
    EntityKind::new(44, "entity.zombie_villager", "Zombie Villager", Some(32)),
    EntityKind::new(45, "entity.witch", "Witch", Some(33)),
    EntityKind::PLAYER,
    EntityKind::new(64, "entity.item", "Dropped Item", None),
    EntityKind::new(65, "entity.tnt", "Primed TNT", None),
    EntityKind::new(84, "entity.minecart", "Minecart", Some(40)),
    EntityKind::new(90, "entity.boat", "Boat", Some(41)),
    EntityKind::new(900, "entity.unknown", "Unknown Entity", Some(63)),
];

const BLOCK_ENTITY_KINDS: &[BlockEntityKind] = &[
    BlockEntityKind::new("block_entity.chest", "Chest"),
    BlockEntityKind::new("block_entity.ender_chest", "Ender Chest"),
    BlockEntityKind::new("block_entity.furnace", "Furnace"),
    BlockEntityKind::new("block_entity.sign", "Sign"),
    BlockEntityKind::new("block_entity.mob_spawner", "Mob Spawner"),
    BlockEntityKind::new("block_entity.enchant_table", "Enchanting Table"),
    BlockEntityKind::new("block_entity.brewing_stand", "Brewing Stand"),
    BlockEntityKind::new("block_entity.beacon", "Beacon"),
    BlockEntityKind::new("block_entity.hopper", "Hopper"),
    BlockEntityKind::new("block_entity.end_portal", "End Portal"),
];

/// One catalog entry: the provider and its filter default.
#[derive(Clone, Debug)]
pub struct CatalogIcon {
    /// The icon provider.
    pub provider: Arc<dyn IconProvider>,
    /// Initial filter state, `None` when the icon is never filtered by category.
    pub filter_default: Option<bool>,
}

/// Every icon known at startup.
#[derive(Clone, Debug, Default)]
pub struct IconCatalog {
    icons: Vec<CatalogIcon>,
}

impl IconCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in entity and block-entity kinds.
    #[must_use]
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for kind in ENTITY_KINDS {
            let filter_default = kind.filter_default();
            catalog.register(Arc::new(kind.clone()), filter_default);
        }
        for kind in BLOCK_ENTITY_KINDS {
            let filter_default = kind.filter_default();
            catalog.register(Arc::new(kind.clone()), filter_default);
        }
        catalog
    }

    /// Adds an icon.
    pub fn register(&mut self, provider: Arc<dyn IconProvider>, filter_default: Option<bool>) {
        self.icons.push(CatalogIcon {
            provider,
            filter_default,
        });
    }

    /// Finds an icon by key.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<Arc<dyn IconProvider>> {
        self.icons
            .iter()
            .find(|icon| icon.provider.key().as_str() == key)
            .map(|icon| Arc::clone(&icon.provider))
    }

    /// Finds an entity icon by numeric entity id.
    #[must_use]
    pub fn entity(&self, id: u32) -> Option<Arc<dyn IconProvider>> {
        ENTITY_KINDS
            .iter()
            .find(|kind| kind.id == id)
            .and_then(|kind| self.lookup(kind.key.as_str()))
    }

    /// Iterates over every entry.
    pub fn iter(&self) -> impl Iterator<Item = &CatalogIcon> {
        self.icons.iter()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.icons.len()
    }

    /// Returns true if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_defaults() {
        let catalog = IconCatalog::builtin();
        let default_of = |key: &str| {
            catalog
                .iter()
                .find(|icon| icon.provider.key().as_str() == key)
                .and_then(|icon| icon.filter_default)
        };

        assert_eq!(default_of("entity.cow"), Some(true));
        assert_eq!(default_of("block_entity.chest"), Some(false));
        // No sprite, no entry.
        assert_eq!(default_of("entity.item"), None);
        // Placeholder id, no entry.
        assert_eq!(default_of("entity.unknown"), None);
    }

    #[test]
    fn test_named_icon_keeps_key() {
        let player: Arc<dyn IconProvider> = Arc::new(EntityKind::PLAYER);
        let named = NamedIcon::new(Arc::clone(&player), "~local_player");
        assert_eq!(named.key(), player.key());
        assert_eq!(named.display_name(), "~local_player");
        assert_eq!(named.category(), IconCategory::Entity);
    }

    #[test]
    fn test_entity_lookup_by_id() {
        let catalog = IconCatalog::builtin();
        let cow = catalog.entity(11).expect("cow is built in");
        assert_eq!(cow.display_name(), "Cow");
        assert!(catalog.entity(12345).is_none());
    }

    #[test]
    fn test_custom_icon_key() {
        let icon = CustomIcon::named("blue_marker", "Home");
        assert_eq!(icon.key().as_str(), "custom.blue_marker");
        assert_eq!(icon.display_name(), "Home");
    }
}
