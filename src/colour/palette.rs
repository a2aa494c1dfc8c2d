//! The process-wide system palette.
//!
//! The palette is the only shared mutable state in the crate. Readers get an
//! `Arc` snapshot of the current table; a refresh swaps in a new table and
//! notifies subscribers. Snapshots never change in place.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use once_cell::sync::Lazy;
use parking_lot::{Mutex, RwLock};
use tracing::debug;

use super::{ColourEntry, ColourTable};
use crate::core::{Error, Result};

/// Listener called with the new table after the palette is refreshed.
pub type PaletteListener = Arc<dyn Fn(&Arc<ColourTable>) + Send + Sync>;

/// Handle returned by [`Palette::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PaletteSubscription(u64);

/// Built-in colours used until a configuration file is loaded.
pub const DEFAULT_LDCONFIG: &str = "\
0 LDraw.org Configuration File
0 Name: LDConfig.ldr
0 !COLOUR Black CODE 0 VALUE #1B2A34 EDGE #808080
0 !COLOUR Blue CODE 1 VALUE #1E5AA8 EDGE #333333
0 !COLOUR Green CODE 2 VALUE #00852B EDGE #333333
0 !COLOUR Dark_Turquoise CODE 3 VALUE #069D9F EDGE #333333
0 !COLOUR Red CODE 4 VALUE #B40000 EDGE #333333
0 !COLOUR Dark_Pink CODE 5 VALUE #D3359D EDGE #333333
0 !COLOUR Brown CODE 6 VALUE #543324 EDGE #1E1E1E
0 !COLOUR Light_Grey CODE 7 VALUE #8A928D EDGE #333333
0 !COLOUR Dark_Grey CODE 8 VALUE #545955 EDGE #333333
0 !COLOUR Light_Blue CODE 9 VALUE #97CBD9 EDGE #333333
0 !COLOUR Bright_Green CODE 10 VALUE #58AB41 EDGE #333333
0 !COLOUR Light_Turquoise CODE 11 VALUE #00AAA4 EDGE #333333
0 !COLOUR Salmon CODE 12 VALUE #F06D61 EDGE #333333
0 !COLOUR Pink CODE 13 VALUE #F6A9BB EDGE #333333
0 !COLOUR Yellow CODE 14 VALUE #FAC80A EDGE #333333
0 !COLOUR White CODE 15 VALUE #F4F4F4 EDGE #808080
0 !COLOUR Main_Colour CODE 16 VALUE #7F7F7F EDGE #333333
0 !COLOUR Edge_Colour CODE 24 VALUE #7F7F7F EDGE #333333
0 !COLOUR Trans_Red CODE 36 VALUE #C91A09 EDGE #880000 ALPHA 128
0 !COLOUR Trans_Clear CODE 47 VALUE #FCFCFC EDGE #C3C3C3 ALPHA 128
0 !COLOUR Glow_In_Dark_Opaque CODE 21 VALUE #E0FFB0 EDGE #A4C2A4 ALPHA 250 LUMINANCE 15
0 !COLOUR Metallic_Silver CODE 80 VALUE #767676 EDGE #333333 METAL
0 !COLOUR Pearl_White CODE 183 VALUE #F2F3F2 EDGE #333333 PEARLESCENT
0 !COLOUR Rubber_Black CODE 256 VALUE #212121 EDGE #595959 RUBBER
0 !COLOUR Chrome_Gold CODE 334 VALUE #DFC176 EDGE #F1E2A7 CHROME
0 !COLOUR Matte_Metallic_Gold CODE 178 VALUE #B4883E EDGE #333333 MATTE_METALLIC
";

static GLOBAL: Lazy<Palette> = Lazy::new(Palette::with_defaults);

/// A refreshable colour table with change subscribers.
pub struct Palette {
    table: RwLock<Arc<ColourTable>>,
    subscribers: Mutex<Vec<(PaletteSubscription, PaletteListener)>>,
    next_subscription: AtomicU64,
}

impl Palette {
    /// The process-wide palette.
    pub fn global() -> &'static Palette {
        &GLOBAL
    }

    pub fn new(mut table: ColourTable) -> Self {
        table.seal();
        Self {
            table: RwLock::new(Arc::new(table)),
            subscribers: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(1),
        }
    }

    /// A palette holding [`DEFAULT_LDCONFIG`].
    pub fn with_defaults() -> Self {
        let table = parse_ldconfig(DEFAULT_LDCONFIG, "LDConfig.ldr").unwrap_or_default();
        Self::new(table)
    }

    /// Snapshot of the current table.
    pub fn table(&self) -> Arc<ColourTable> {
        Arc::clone(&self.table.read())
    }

    pub fn entry(&self, code: u32) -> Option<ColourEntry> {
        self.table.read().get(code).cloned()
    }

    /// Swap in `table` and notify subscribers.
    pub fn replace(&self, mut table: ColourTable) {
        table.seal();
        let table = Arc::new(table);
        *self.table.write() = Arc::clone(&table);
        debug!(colours = table.len(), "palette replaced");

        let listeners: Vec<PaletteListener> = self
            .subscribers
            .lock()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(&table);
        }
    }

    /// Replace the palette from LDConfig-format text. Returns the colour count.
    pub fn load_str(&self, text: &str, source_name: &str) -> Result<usize> {
        let table = parse_ldconfig(text, source_name)?;
        let count = table.len();
        self.replace(table);
        Ok(count)
    }

    /// Replace the palette from an LDConfig file on disk.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        self.load_str(&text, &path.display().to_string())
    }

    pub fn subscribe(
        &self,
        listener: impl Fn(&Arc<ColourTable>) + Send + Sync + 'static,
    ) -> PaletteSubscription {
        let id = PaletteSubscription(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.subscribers.lock().push((id, Arc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: PaletteSubscription) -> bool {
        let mut subscribers = self.subscribers.lock();
        let before = subscribers.len();
        subscribers.retain(|(sub, _)| *sub != id);
        subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }
}

/// Parse the `0 !COLOUR` lines of an LDConfig file; other lines are ignored.
pub fn parse_ldconfig(text: &str, source_name: &str) -> Result<ColourTable> {
    let mut table = ColourTable::new();
    for (index, line) in text.lines().enumerate() {
        let Some(payload) = line
            .trim()
            .strip_prefix('0')
            .map(str::trim_start)
            .and_then(|rest| rest.strip_prefix("!COLOUR"))
        else {
            continue;
        };
        let entry = ColourEntry::parse_definition(payload)
            .map_err(|message| Error::format(source_name, index + 1, message))?;
        table.insert(entry)?;
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colour::Material;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_defaults_loaded() {
        let palette = Palette::with_defaults();
        let table = palette.table();
        assert!(table.is_frozen());
        assert_eq!(table.get(4).map(ColourEntry::name), Some("Red"));
        assert_eq!(table.get(334).map(|e| e.material().clone()), Some(Material::Chrome));
        assert!(!table.get(4).unwrap().is_frozen());
    }

    #[test]
    fn test_replace_notifies_and_keeps_old_snapshot() {
        let palette = Palette::with_defaults();
        let before = palette.table();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let sub = palette.subscribe(move |table| {
            assert_eq!(table.len(), 1);
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let count = palette
            .load_str("0 !COLOUR Only CODE 99 VALUE #123456 EDGE #000000\n", "test.ldr")
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(before.contains(4));
        assert!(!palette.table().contains(4));

        assert!(palette.unsubscribe(sub));
        palette.replace(ColourTable::new());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_ldconfig_error_reports_line() {
        let err = parse_ldconfig("0 comment\n0 !COLOUR Bad CODE x VALUE #000000 EDGE #000000\n", "cfg.ldr")
            .unwrap_err();
        match err {
            Error::Format { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
