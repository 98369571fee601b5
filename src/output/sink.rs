//! # Event Sink
//!
//! Key events leave the bridge through an [`EventSink`]. The production sink
//! is a uinput virtual keyboard; tests use a recording mock.
//!
//! Events for one poll cycle are buffered by [`EventSink::emit`] and written
//! together by [`EventSink::sync`], so consumers see one coherent batch per
//! cycle followed by a single `SYN_REPORT`.

use std::collections::BTreeSet;

use evdev::uinput::{VirtualDevice, VirtualDeviceBuilder};
use evdev::{AttributeSet, EventType, InputEvent, Key};
use tracing::{debug, info};

use crate::controller::keymap::KEY_MAP;
use crate::error::{BridgeError, Result};

/// evdev key values
const KEY_RELEASED: i32 = 0;
const KEY_PRESSED: i32 = 1;

/// Consumer of key edges.
pub trait EventSink {
    /// Queue a key press or release.
    fn emit(&mut self, key: Key, pressed: bool) -> Result<()>;

    /// Flush queued events as one batch.
    fn sync(&mut self) -> Result<()>;

    /// Release every key currently held, then flush.
    fn release_all(&mut self) -> Result<()>;

    /// Release every key and tear the sink down. Nothing may be emitted afterwards.
    fn close(&mut self) -> Result<()> {
        self.release_all()
    }
}

impl<T: EventSink + ?Sized> EventSink for Box<T> {
    fn emit(&mut self, key: Key, pressed: bool) -> Result<()> {
        (**self).emit(key, pressed)
    }

    fn sync(&mut self) -> Result<()> {
        (**self).sync()
    }

    fn release_all(&mut self) -> Result<()> {
        (**self).release_all()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

/// Virtual keyboard registered through `/dev/uinput`.
///
/// The device only advertises the keys in [`KEY_MAP`]. It is destroyed on
/// [`close`](EventSink::close) or when dropped.
pub struct VirtualKeyboard {
    device: Option<VirtualDevice>,
    name: String,
    pending: Vec<InputEvent>,
    held: BTreeSet<u16>,
}

impl std::fmt::Debug for VirtualKeyboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualKeyboard")
            .field("name", &self.name)
            .field("pending", &self.pending.len())
            .field("held", &self.held)
            .field("open", &self.device.is_some())
            .finish_non_exhaustive()
    }
}

impl VirtualKeyboard {
    /// Create the virtual keyboard
    ///
    /// # Errors
    ///
    /// Returns `VirtualDevice` error if `/dev/uinput` cannot be opened
    /// (usually a permissions problem) or the device cannot be created.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use wiiclassic_keyboard::output::sink::VirtualKeyboard;
    ///
    /// let keyboard = VirtualKeyboard::create("wiiclassic-virtual-keyboard")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn create(name: &str) -> Result<Self> {
        let mut keys = AttributeSet::<Key>::new();
        for key in KEY_MAP {
            keys.insert(key);
        }

        let device = VirtualDeviceBuilder::new()
            .map_err(|e| BridgeError::VirtualDevice(format!("Failed to open /dev/uinput: {}", e)))?
            .name(name)
            .with_keys(&keys)
            .map_err(|e| BridgeError::VirtualDevice(format!("Failed to enable keys: {}", e)))?
            .build()
            .map_err(|e| BridgeError::VirtualDevice(format!("Failed to create {}: {}", name, e)))?;

        info!("Created virtual keyboard '{}' with {} keys", name, KEY_MAP.len());

        Ok(Self {
            device: Some(device),
            name: name.to_string(),
            pending: Vec::with_capacity(KEY_MAP.len()),
            held: BTreeSet::new(),
        })
    }
}

impl EventSink for VirtualKeyboard {
    fn emit(&mut self, key: Key, pressed: bool) -> Result<()> {
        let value = if pressed { KEY_PRESSED } else { KEY_RELEASED };
        self.pending.push(InputEvent::new(EventType::KEY, key.code(), value));

        if pressed {
            self.held.insert(key.code());
        } else {
            self.held.remove(&key.code());
        }
        Ok(())
    }

    fn sync(&mut self) -> Result<()> {
        let device = self
            .device
            .as_mut()
            .ok_or_else(|| BridgeError::VirtualDevice(format!("{} is closed", self.name)))?;

        // VirtualDevice::emit appends the SYN_REPORT itself.
        let result = device
            .emit(&self.pending)
            .map_err(|e| {
                BridgeError::VirtualDevice(format!("Failed to emit events on {}: {}", self.name, e))
            });
        self.pending.clear();
        result
    }

    fn release_all(&mut self) -> Result<()> {
        let held: Vec<u16> = self.held.iter().copied().collect();
        debug!("Releasing {} held keys", held.len());

        for code in held {
            self.emit(Key::new(code), false)?;
        }
        self.sync()
    }

    fn close(&mut self) -> Result<()> {
        if self.device.is_none() {
            return Ok(());
        }
        let released = self.release_all();
        self.device = None;
        info!("Destroyed virtual keyboard '{}'", self.name);
        released
    }
}

#[cfg(test)]
pub mod mocks {
    use super::*;
    use std::collections::BTreeSet;

    /// Everything a [`RecordingSink`] has been asked to do
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum SinkCall {
        Emit(Key, bool),
        Sync,
        ReleaseAll,
        Close,
    }

    /// Mock event sink for testing
    #[derive(Debug, Default)]
    pub struct RecordingSink {
        pub calls: Vec<SinkCall>,
        pub held: BTreeSet<u16>,
        pub fail_emit: bool,
    }

    impl RecordingSink {
        pub fn new() -> Self {
            Self::default()
        }

        /// Key edges only, in emission order
        pub fn edges(&self) -> Vec<(Key, bool)> {
            self.calls
                .iter()
                .filter_map(|call| match call {
                    SinkCall::Emit(key, pressed) => Some((*key, *pressed)),
                    _ => None,
                })
                .collect()
        }

        pub fn sync_count(&self) -> usize {
            self.calls.iter().filter(|c| **c == SinkCall::Sync).count()
        }
    }

    impl EventSink for RecordingSink {
        fn emit(&mut self, key: Key, pressed: bool) -> Result<()> {
            if self.fail_emit {
                return Err(BridgeError::VirtualDevice("Mock emit error".to_string()));
            }
            self.calls.push(SinkCall::Emit(key, pressed));
            if pressed {
                self.held.insert(key.code());
            } else {
                self.held.remove(&key.code());
            }
            Ok(())
        }

        fn sync(&mut self) -> Result<()> {
            self.calls.push(SinkCall::Sync);
            Ok(())
        }

        fn release_all(&mut self) -> Result<()> {
            self.calls.push(SinkCall::ReleaseAll);
            self.held.clear();
            Ok(())
        }

        fn close(&mut self) -> Result<()> {
            self.calls.push(SinkCall::Close);
            self.held.clear();
            Ok(())
        }
    }
}
