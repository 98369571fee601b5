//! Trait abstraction for packet reads to enable testing

use crate::controller::packet::RawPacket;
use crate::error::Result;

/// Anything that can produce one controller packet per poll.
pub trait PacketSource {
    /// Blocks until a full packet has been read.
    fn read_packet(&mut self) -> Result<RawPacket>;
}

impl<T: PacketSource + ?Sized> PacketSource for Box<T> {
    fn read_packet(&mut self) -> Result<RawPacket> {
        (**self).read_packet()
    }
}
