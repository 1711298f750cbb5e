//! Host-side stand-ins for the keyboard, the delay provider and the interrupt line.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::digital::ErrorKind as PinErrorKind;
use embedded_hal::i2c::{ErrorKind, ErrorType as I2cErrorType, NoAcknowledgeSource, Operation};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::digital::Wait;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use crate::interrupt::{Edge, InterruptLine, Pull};
use crate::reg::{keys, Register, WRITE_MASK};

/// A bus transfer as seen by the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusOp {
    Write(Vec<u8>),
    Read(usize),
}

struct DeviceState {
    registers: [u8; 256],
    pointer: u8,
    fifo: VecDeque<[u8; 2]>,
    ops: Vec<BusOp>,
    resets: usize,
    fail_next: bool,
    line: Option<MockPin>,
}

impl Default for DeviceState {
    fn default() -> Self {
        Self {
            registers: [0; 256],
            pointer: 0,
            fifo: VecDeque::new(),
            ops: Vec::new(),
            resets: 0,
            fail_next: false,
            line: None,
        }
    }
}

/// A simulated BBQ10 keyboard with a register file and a key FIFO.
#[derive(Clone, Default)]
pub struct Bbq10 {
    state: Rc<RefCell<DeviceState>>,
}

impl Bbq10 {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_register(&self, reg: impl Into<u8>, value: u8) {
        self.state.borrow_mut().registers[reg.into() as usize] = value;
    }

    pub fn register(&self, reg: impl Into<u8>) -> u8 {
        self.state.borrow().registers[reg.into() as usize]
    }

    /// Queues a FIFO entry.
    pub fn push_key(&self, state: u8, key: u8) {
        self.state.borrow_mut().fifo.push_back([state, key]);
    }

    pub fn ops(&self) -> Vec<BusOp> {
        self.state.borrow().ops.clone()
    }

    pub fn clear_ops(&self) {
        self.state.borrow_mut().ops.clear();
    }

    /// Values written to `reg`, in order.
    pub fn writes_to(&self, reg: impl Into<u8>) -> Vec<u8> {
        let reg = reg.into() | WRITE_MASK;
        self.state
            .borrow()
            .ops
            .iter()
            .filter_map(|op| match op {
                BusOp::Write(bytes) if bytes.len() == 2 && bytes[0] == reg => Some(bytes[1]),
                _ => None,
            })
            .collect()
    }

    pub fn resets(&self) -> usize {
        self.state.borrow().resets
    }

    /// Makes the next transfer fail with a NACK.
    pub fn fail_next(&self) {
        self.state.borrow_mut().fail_next = true;
    }

    /// Connects the device's interrupt output to `pin`.
    pub fn wire_interrupt(&self, pin: &MockPin) {
        self.state.borrow_mut().line = Some(pin.clone());
    }

    fn on_write(&self, bytes: &[u8]) {
        let mut state = self.state.borrow_mut();
        state.ops.push(BusOp::Write(bytes.to_vec()));
        match *bytes {
            [reg, value] if reg & WRITE_MASK != 0 => {
                state.registers[(reg & !WRITE_MASK) as usize] = value;
            }
            [reg, ..] if reg == Register::Reset as u8 => {
                state.resets += 1;
                state.fifo.clear();
                state.registers[Register::Backlight as usize] = 0;
                // The firmware pulses its interrupt line while rebooting.
                if let Some(line) = state.line.as_ref() {
                    line.assert_line();
                }
            }
            [reg, ..] => state.pointer = reg,
            [] => {}
        }
    }

    fn on_read(&self, buf: &mut [u8]) {
        let mut state = self.state.borrow_mut();
        state.ops.push(BusOp::Read(buf.len()));
        let pointer = state.pointer;
        let response = match pointer {
            reg if reg == Register::Fifo as u8 => state.fifo.pop_front().unwrap_or([0, 0]),
            reg if reg == Register::Keys as u8 => {
                let locks = state.registers[reg as usize] & !keys::COUNT_MASK;
                [locks | (state.fifo.len() as u8 & keys::COUNT_MASK), 0]
            }
            reg => [state.registers[reg as usize], 0],
        };
        for (dst, src) in buf.iter_mut().zip(response) {
            *dst = src;
        }
    }
}

impl I2cErrorType for Bbq10 {
    type Error = ErrorKind;
}

impl I2c<SevenBitAddress> for Bbq10 {
    async fn transaction(
        &mut self,
        _address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if core::mem::take(&mut self.state.borrow_mut().fail_next) {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        for op in operations {
            match op {
                Operation::Write(bytes) => self.on_write(bytes),
                Operation::Read(buf) => self.on_read(buf),
            }
        }
        Ok(())
    }
}

/// Records every requested delay.
#[derive(Clone, Default)]
pub struct MockDelay {
    delays_ns: Rc<RefCell<Vec<u32>>>,
}

impl MockDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn millis(&self) -> Vec<u32> {
        self.delays_ns.borrow().iter().map(|ns| ns / 1_000_000).collect()
    }

    pub fn clear(&self) {
        self.delays_ns.borrow_mut().clear();
    }

    /// Sum of every recorded delay.
    pub fn total_ns(&self) -> u64 {
        self.delays_ns.borrow().iter().map(|&ns| u64::from(ns)).sum()
    }
}

impl DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.delays_ns.borrow_mut().push(ns);
    }
}

#[derive(Default)]
struct PinState {
    pull: Option<Pull>,
    trigger: Option<Edge>,
    pending_edges: usize,
    edges_while_armed: usize,
    fail_arming: bool,
}

/// An interrupt line driven by the test.
#[derive(Clone, Default)]
pub struct MockPin {
    state: Rc<RefCell<PinState>>,
}

impl MockPin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pull(&self) -> Option<Pull> {
        self.state.borrow().pull
    }

    pub fn trigger(&self) -> Option<Edge> {
        self.state.borrow().trigger
    }

    pub fn pending_edges(&self) -> usize {
        self.state.borrow().pending_edges
    }

    /// Falling edges that arrived while an interrupt was armed on the pin.
    pub fn edges_while_armed(&self) -> usize {
        self.state.borrow().edges_while_armed
    }

    /// Makes every later attempt to arm an edge trigger fail.
    pub fn fail_arming(&self) {
        self.state.borrow_mut().fail_arming = true;
    }

    /// Pulls the line low once.
    pub fn assert_line(&self) {
        let mut state = self.state.borrow_mut();
        if state.trigger.is_some() {
            state.edges_while_armed += 1;
            state.pending_edges += 1;
        }
    }
}

impl embedded_hal::digital::ErrorType for MockPin {
    type Error = PinErrorKind;
}

impl MockPin {
    fn take_edge(&mut self) -> Result<(), PinErrorKind> {
        let mut state = self.state.borrow_mut();
        assert!(state.pending_edges > 0, "no interrupt scripted on the mock pin");
        state.pending_edges -= 1;
        Ok(())
    }
}

impl Wait for MockPin {
    async fn wait_for_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn wait_for_low(&mut self) -> Result<(), Self::Error> {
        self.take_edge()
    }

    async fn wait_for_rising_edge(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn wait_for_falling_edge(&mut self) -> Result<(), Self::Error> {
        self.take_edge()
    }

    async fn wait_for_any_edge(&mut self) -> Result<(), Self::Error> {
        self.take_edge()
    }
}

impl InterruptLine for MockPin {
    fn configure_input(&mut self, pull: Pull) -> Result<(), Self::Error> {
        self.state.borrow_mut().pull = Some(pull);
        Ok(())
    }

    fn set_trigger(&mut self, trigger: Option<Edge>) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        if trigger.is_some() && state.fail_arming {
            return Err(PinErrorKind::Other);
        }
        state.trigger = trigger;
        Ok(())
    }
}
