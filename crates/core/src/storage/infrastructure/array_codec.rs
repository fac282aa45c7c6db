use std::io::{Read, Write};

use ndarray::{ArrayD, IxDyn};

use crate::shared::error::ComponentError;

const MAX_DIMENSIONS: u32 = 8;

/// Writes an `f64` array as: `u32` rank, `u64` per axis length, values.
///
/// All integers and values are little-endian. Suitable as the per-item
/// writer of a frame container holding images or feature vectors.
pub fn write_array(array: &ArrayD<f64>, sink: &mut dyn Write) -> Result<(), ComponentError> {
    sink.write_all(&(array.ndim() as u32).to_le_bytes())?;
    for &len in array.shape() {
        sink.write_all(&(len as u64).to_le_bytes())?;
    }
    for value in array.iter() {
        sink.write_all(&value.to_le_bytes())?;
    }
    Ok(())
}

pub fn read_array(source: &mut dyn Read) -> Result<ArrayD<f64>, ComponentError> {
    let rank = u32::from_le_bytes(read_bytes::<4>(source)?);
    if rank > MAX_DIMENSIONS {
        return Err(format!("array rank {rank} exceeds {MAX_DIMENSIONS}").into());
    }

    let mut shape = Vec::with_capacity(rank as usize);
    for _ in 0..rank {
        let len = u64::from_le_bytes(read_bytes::<8>(source)?);
        shape.push(usize::try_from(len)?);
    }
    let count = shape
        .iter()
        .try_fold(1usize, |acc, &len| acc.checked_mul(len))
        .ok_or("array shape overflows")?;

    let mut values = Vec::new();
    for _ in 0..count {
        values.push(f64::from_le_bytes(read_bytes::<8>(source)?));
    }
    Ok(ArrayD::from_shape_vec(IxDyn(&shape), values)?)
}

fn read_bytes<const N: usize>(source: &mut dyn Read) -> std::io::Result<[u8; N]> {
    let mut bytes = [0u8; N];
    source.read_exact(&mut bytes)?;
    Ok(bytes)
}
