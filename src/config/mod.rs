mod structs;
pub use structs::*;

use core::fmt;

use crc::{Crc, CRC_32_ISCSI};
use embedded_storage::{ReadStorage, Storage};
use log::{debug, warn};
use serde::{de::DeserializeOwned, Serialize};

use crate::calibration::CalibrationRecord;

const CRC: Crc<u32> = Crc::<u32>::new(&CRC_32_ISCSI);

/// room for one encoded config or calibration record including its CRC
pub const RECORD_BUFFER_SIZE: usize = 128;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PersistError<E> {
    Storage(E),
    /// record does not fit into `RECORD_BUFFER_SIZE`
    Encode,
    /// no valid record at that offset, or the CRC does not match
    Decode,
}

impl<E: fmt::Debug> fmt::Display for PersistError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistError::Storage(e) => write!(f, "storage error: {e:?}"),
            PersistError::Encode => write!(f, "record too large"),
            PersistError::Decode => write!(f, "no valid record"),
        }
    }
}

/// Writes `value` as postcard followed by its CRC-32 at `offset`, returns the number of bytes.
pub fn save<S: Storage, T: Serialize>(
    storage: &mut S,
    offset: u32,
    value: &T,
) -> Result<usize, PersistError<S::Error>> {
    let mut buffer = [0u8; RECORD_BUFFER_SIZE];
    let n = postcard::to_slice_crc32(value, &mut buffer, CRC.digest())
        .map_err(|_| PersistError::Encode)?
        .len();

    debug!("saving {n} bytes at offset {offset}");
    storage
        .write(offset, &buffer[..n])
        .map_err(PersistError::Storage)?;
    Ok(n)
}

pub fn load<S: ReadStorage, T: DeserializeOwned>(
    storage: &mut S,
    offset: u32,
) -> Result<T, PersistError<S::Error>> {
    let mut buffer = [0u8; RECORD_BUFFER_SIZE];
    let len = storage
        .capacity()
        .saturating_sub(offset as usize)
        .min(RECORD_BUFFER_SIZE);
    if len == 0 {
        return Err(PersistError::Decode);
    }
    storage
        .read(offset, &mut buffer[..len])
        .map_err(PersistError::Storage)?;

    match postcard::take_from_bytes_crc32::<T>(&buffer[..len], CRC.digest()) {
        Ok((value, _)) => Ok(value),
        Err(e) => {
            warn!("no valid record at offset {offset}: {e:?}");
            Err(PersistError::Decode)
        }
    }
}

pub fn save_calibration<S: Storage>(
    storage: &mut S,
    offset: u32,
    record: &CalibrationRecord,
) -> Result<usize, PersistError<S::Error>> {
    save(storage, offset, record)
}

pub fn load_calibration<S: ReadStorage>(
    storage: &mut S,
    offset: u32,
) -> Result<CalibrationRecord, PersistError<S::Error>> {
    load(storage, offset)
}

pub fn save_config<S: Storage>(
    storage: &mut S,
    offset: u32,
    config: &Cs5460Config,
) -> Result<usize, PersistError<S::Error>> {
    save(storage, offset, config)
}

pub fn load_config<S: ReadStorage>(
    storage: &mut S,
    offset: u32,
) -> Result<Cs5460Config, PersistError<S::Error>> {
    load(storage, offset)
}
