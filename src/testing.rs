//! Simulated CS5460 for unit tests.
//!
//! One shared state backs the bus, the pins and the delay, so tests can hand the pieces to a
//! driver and inspect the recorded traffic afterwards.

use std::cell::{RefCell, RefMut};
use std::convert::Infallible;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, InputPin, OutputPin};
use embedded_hal::spi::{self, SpiBus};

use crate::chip::{status_bits, Reg, WRITE_REGISTER};
use crate::driver::spi::Cs5460SpiDriver;

pub type SimDriver = Cs5460SpiDriver<SimBus, SimPin, SimDelay>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Line {
    Cs,
    Reset,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Pin(Line, bool),
    Byte { tx: u8, rx: u8 },
    Flush,
    /// nanoseconds
    Delay(u64),
}

#[derive(Default)]
struct State {
    registers: [u32; 32],
    selected: bool,
    /// bytes seen since chip select went low
    frame: Vec<u8>,
    pending_read: u32,
    status_reads: u32,
    ready_after: Option<u32>,
    status_clears: Vec<u32>,
    commands: Vec<u8>,
    edir: bool,
    eout: bool,
    /// bus calls fail without clocking any byte
    bus_fault: bool,
    events: Vec<Event>,
}

impl State {
    fn exchange(&mut self, tx: u8) -> u8 {
        if !self.selected {
            self.events.push(Event::Byte { tx, rx: 0xFF });
            return 0xFF;
        }

        let rx = match self.frame.first().copied() {
            None => {
                if tx & 0x80 != 0 {
                    self.commands.push(tx);
                } else if tx & WRITE_REGISTER == 0 {
                    self.pending_read = self.read((tx >> 1) & 0x1F);
                }
                0xFF
            }
            Some(_) if self.frame.len() > 3 => 0xFF,
            Some(cmd) if cmd & 0x80 == 0 && cmd & WRITE_REGISTER == 0 => {
                let shift = 8 * (3 - self.frame.len());
                (self.pending_read >> shift) as u8
            }
            Some(cmd) if cmd & 0x80 == 0 => {
                if self.frame.len() == 3 {
                    let value = u32::from_be_bytes([0, self.frame[1], self.frame[2], tx]);
                    self.write((cmd >> 1) & 0x1F, value);
                }
                0xFF
            }
            Some(_) => 0xFF,
        };

        self.frame.push(tx);
        self.events.push(Event::Byte { tx, rx });
        rx
    }

    fn read(&mut self, index: u8) -> u32 {
        let mut value = self.registers[index as usize];
        if index == Reg::STATUS as u8 {
            self.status_reads += 1;
            if self.ready_after.is_some_and(|n| self.status_reads > n) {
                value |= status_bits::DATA_READY;
            }
        }
        value
    }

    fn write(&mut self, index: u8, value: u32) {
        if index == Reg::STATUS as u8 {
            self.status_clears.push(value);
            self.registers[index as usize] &= !value;
        } else {
            self.registers[index as usize] = value;
        }
    }
}

#[derive(Clone, Default)]
pub struct SimChip(Rc<RefCell<State>>);

impl SimChip {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bus(&self) -> SimBus {
        SimBus(self.0.clone())
    }

    pub fn cs(&self) -> SimPin {
        SimPin(self.0.clone(), Line::Cs)
    }

    pub fn reset(&self) -> SimPin {
        SimPin(self.0.clone(), Line::Reset)
    }

    pub fn delay(&self) -> SimDelay {
        SimDelay(self.0.clone())
    }

    pub fn edir(&self) -> SimInput {
        SimInput(self.0.clone(), false)
    }

    pub fn eout(&self) -> SimInput {
        SimInput(self.0.clone(), true)
    }

    /// bus and chip select driver without optional pins
    pub fn driver(&self) -> SimDriver {
        Cs5460SpiDriver::new(self.bus(), self.cs(), self.delay())
    }

    pub fn set_register(&self, reg: Reg, value: u32) {
        self.0.borrow_mut().registers[reg as usize] = value & 0xFF_FFFF;
    }

    pub fn register(&self, reg: Reg) -> u32 {
        self.0.borrow().registers[reg as usize]
    }

    /// STATUS reads report data ready once more than `polls` reads happened
    pub fn data_ready_after(&self, polls: u32) {
        self.0.borrow_mut().ready_after = Some(polls);
    }

    pub fn set_bus_fault(&self, fault: bool) {
        self.0.borrow_mut().bus_fault = fault;
    }

    pub fn set_energy_lines(&self, edir: bool, eout: bool) {
        let mut state = self.0.borrow_mut();
        state.edir = edir;
        state.eout = eout;
    }

    pub fn status_reads(&self) -> u32 {
        self.0.borrow().status_reads
    }

    pub fn status_clears(&self) -> Vec<u32> {
        self.0.borrow().status_clears.clone()
    }

    /// single-byte commands, in order
    pub fn commands(&self) -> Vec<u8> {
        self.0.borrow().commands.clone()
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().events.clone()
    }

    pub fn sent_bytes(&self) -> Vec<u8> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Byte { tx, .. } => Some(tx),
                _ => None,
            })
            .collect()
    }

    pub fn received_bytes(&self) -> Vec<u8> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Byte { rx, .. } => Some(rx),
                _ => None,
            })
            .collect()
    }
}

pub struct SimBus(Rc<RefCell<State>>);

impl SimBus {
    fn state(&self) -> Result<RefMut<'_, State>, spi::ErrorKind> {
        let state = self.0.borrow_mut();
        if state.bus_fault {
            return Err(spi::ErrorKind::Other);
        }
        Ok(state)
    }
}

impl spi::ErrorType for SimBus {
    type Error = spi::ErrorKind;
}

impl SpiBus for SimBus {
    fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        let mut state = self.state()?;
        for word in words {
            *word = state.exchange(0x00);
        }
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        let mut state = self.state()?;
        for word in words {
            state.exchange(*word);
        }
        Ok(())
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        let mut state = self.state()?;
        for i in 0..read.len().max(write.len()) {
            let rx = state.exchange(write.get(i).copied().unwrap_or(0x00));
            if let Some(word) = read.get_mut(i) {
                *word = rx;
            }
        }
        Ok(())
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        let mut state = self.state()?;
        for word in words {
            *word = state.exchange(*word);
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.0.borrow_mut().events.push(Event::Flush);
        Ok(())
    }
}

pub struct SimPin(Rc<RefCell<State>>, Line);

impl digital::ErrorType for SimPin {
    type Error = Infallible;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        let mut state = self.0.borrow_mut();
        if self.1 == Line::Cs {
            state.selected = true;
            state.frame.clear();
        }
        state.events.push(Event::Pin(self.1, false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        let mut state = self.0.borrow_mut();
        if self.1 == Line::Cs {
            state.selected = false;
            state.frame.clear();
        }
        state.events.push(Event::Pin(self.1, true));
        Ok(())
    }
}

/// Output or input pin whose every access fails.
pub struct BrokenPin;

impl digital::ErrorType for BrokenPin {
    type Error = digital::ErrorKind;
}

impl OutputPin for BrokenPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Err(digital::ErrorKind::Other)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Err(digital::ErrorKind::Other)
    }
}

impl InputPin for BrokenPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Err(digital::ErrorKind::Other)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Err(digital::ErrorKind::Other)
    }
}

/// EDIR when the flag is false, EOUT when true
pub struct SimInput(Rc<RefCell<State>>, bool);

impl digital::ErrorType for SimInput {
    type Error = Infallible;
}

impl InputPin for SimInput {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let state = self.0.borrow();
        Ok(if self.1 { state.eout } else { state.edir })
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

pub struct SimDelay(Rc<RefCell<State>>);

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().events.push(Event::Delay(ns as u64));
    }

    fn delay_us(&mut self, us: u32) {
        self.0.borrow_mut().events.push(Event::Delay(us as u64 * 1_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0.borrow_mut().events.push(Event::Delay(ms as u64 * 1_000_000));
    }
}
