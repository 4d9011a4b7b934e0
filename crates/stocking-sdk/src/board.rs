//! The advent board: one sock per prize, dealt in random order.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use stocking_types::PrizeId;
use tracing::debug;

use crate::error::{SdkError, SdkResult};

/// One sock on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sock {
    pub prize: PrizeId,
    pub opened: bool,
}

/// A dealt board.
///
/// Each slot holds a distinct prize; together the slots hold every prize
/// exactly once. A slot can be opened once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizeBoard {
    socks: Vec<Sock>,
}

impl PrizeBoard {
    /// Deal a fresh board with the thread-local RNG.
    pub fn deal() -> Self {
        Self::deal_with(&mut rand::thread_rng())
    }

    /// Deal a fresh board from `rng`.
    pub fn deal_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut prizes: Vec<PrizeId> = PrizeId::all().collect();
        prizes.shuffle(rng);
        Self {
            socks: prizes
                .into_iter()
                .map(|prize| Sock {
                    prize,
                    opened: false,
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.socks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.socks.is_empty()
    }

    pub fn socks(&self) -> &[Sock] {
        &self.socks
    }

    pub fn sock(&self, slot: usize) -> Option<&Sock> {
        self.socks.get(slot)
    }

    /// Open `slot` and reveal its prize.
    pub fn open(&mut self, slot: usize) -> SdkResult<PrizeId> {
        let total = self.socks.len();
        let sock = self
            .socks
            .get_mut(slot)
            .ok_or(SdkError::InvalidSlot { slot, total })?;
        if sock.opened {
            return Err(SdkError::AlreadyOpened(slot));
        }
        sock.opened = true;
        debug!(slot, prize = %sock.prize, "sock opened");
        Ok(sock.prize)
    }

    pub fn opened_count(&self) -> usize {
        self.socks.iter().filter(|s| s.opened).count()
    }

    /// True once every sock has been opened.
    pub fn is_finished(&self) -> bool {
        self.socks.iter().all(|s| s.opened)
    }

    /// Redeal with the thread-local RNG.
    pub fn reset(&mut self) {
        *self = Self::deal();
    }
}
