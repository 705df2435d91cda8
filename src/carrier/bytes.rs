// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Linear byte carriers.
//!
//! Non-image media (MP3 audio data, raw sample streams) expose a flat byte
//! buffer plus the positions that may be modified without corrupting the
//! container. Locating those positions is the job of the container parser;
//! this type only guards that they stay inside the buffer and that each
//! byte is listed once.

use std::collections::HashSet;

use super::error::{CarrierError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteCarrier {
    bytes: Vec<u8>,
    positions: Vec<usize>,
}

impl ByteCarrier {
    /// Wrap `bytes`, allowing only `positions` to be modified.
    pub fn new(bytes: Vec<u8>, positions: Vec<usize>) -> Result<Self> {
        if let Some(&position) = positions.iter().find(|&&p| p >= bytes.len()) {
            return Err(CarrierError::PositionOutOfRange { position, len: bytes.len() });
        }
        let mut seen = HashSet::with_capacity(positions.len());
        if let Some(&position) = positions.iter().find(|&&p| !seen.insert(p)) {
            return Err(CarrierError::DuplicatePosition(position));
        }
        Ok(Self { bytes, positions })
    }

    /// Every byte of the buffer is modifiable.
    pub fn whole(bytes: Vec<u8>) -> Self {
        let positions = (0..bytes.len()).collect();
        Self { bytes, positions }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Byte at the `unit`-th modifiable position.
    pub fn get(&self, unit: usize) -> u8 {
        self.bytes[self.positions[unit]]
    }

    pub fn set(&mut self, unit: usize, value: u8) {
        let pos = self.positions[unit];
        self.bytes[pos] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_map_into_buffer() {
        let mut carrier = ByteCarrier::new(vec![10, 20, 30, 40], vec![3, 1]).unwrap();
        assert_eq!(carrier.len(), 2);
        assert_eq!(carrier.get(0), 40);
        carrier.set(1, 21);
        assert_eq!(carrier.as_bytes(), &[10, 21, 30, 40]);
    }

    #[test]
    fn out_of_range_position() {
        let err = ByteCarrier::new(vec![0; 4], vec![0, 4]).unwrap_err();
        assert!(matches!(err, CarrierError::PositionOutOfRange { position: 4, len: 4 }));
    }

    #[test]
    fn repeated_position_rejected() {
        let err = ByteCarrier::new(vec![0; 8], vec![1, 5, 2, 5]).unwrap_err();
        assert!(matches!(err, CarrierError::DuplicatePosition(5)));
    }

    #[test]
    fn whole_buffer() {
        let carrier = ByteCarrier::whole(vec![1, 2, 3]);
        assert_eq!(carrier.positions(), &[0, 1, 2]);
        assert_eq!(carrier.into_bytes(), vec![1, 2, 3]);
    }
}
