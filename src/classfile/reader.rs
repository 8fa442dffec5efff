// Mon Oct 19 2026 - Alex

use super::error::ClassFileError;

pub const MAGIC: u32 = 0xCAFEBABE;

/// Big-endian cursor over a class file or a code array.
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn at(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn expect_magic(&mut self) -> Result<(), ClassFileError> {
        let magic = self.read_u4()?;
        if magic != MAGIC {
            return Err(ClassFileError::InvalidMagic(magic));
        }
        Ok(())
    }

    fn ensure(&self, len: usize) -> Result<(), ClassFileError> {
        if self.pos + len > self.data.len() {
            return Err(ClassFileError::UnexpectedEof(self.pos));
        }
        Ok(())
    }

    pub fn read_u1(&mut self) -> Result<u8, ClassFileError> {
        self.ensure(1)?;
        let value = self.data[self.pos];
        self.pos += 1;
        Ok(value)
    }

    pub fn read_u2(&mut self) -> Result<u16, ClassFileError> {
        self.ensure(2)?;
        let value = u16::from_be_bytes([self.data[self.pos], self.data[self.pos + 1]]);
        self.pos += 2;
        Ok(value)
    }

    pub fn read_u4(&mut self) -> Result<u32, ClassFileError> {
        self.ensure(4)?;
        let value = u32::from_be_bytes([
            self.data[self.pos],
            self.data[self.pos + 1],
            self.data[self.pos + 2],
            self.data[self.pos + 3],
        ]);
        self.pos += 4;
        Ok(value)
    }

    pub fn read_i4(&mut self) -> Result<i32, ClassFileError> {
        Ok(self.read_u4()? as i32)
    }

    pub fn read_u8(&mut self) -> Result<u64, ClassFileError> {
        let high = self.read_u4()? as u64;
        let low = self.read_u4()? as u64;
        Ok((high << 32) | low)
    }

    pub fn read_slice(&mut self, len: usize) -> Result<&'a [u8], ClassFileError> {
        self.ensure(len)?;
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    pub fn skip(&mut self, len: usize) -> Result<(), ClassFileError> {
        self.ensure(len)?;
        self.pos += len;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_big_endian_reads() {
        let data = [0xCA, 0xFE, 0xBA, 0xBE, 0x00, 0x34, 0xFF];
        let mut reader = ByteReader::new(&data);
        reader.expect_magic().unwrap();
        assert_eq!(reader.read_u2().unwrap(), 0x34);
        assert_eq!(reader.read_u1().unwrap(), 0xFF);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_eof_reports_offset() {
        let data = [0x00, 0x01, 0x02];
        let mut reader = ByteReader::new(&data);
        reader.read_u2().unwrap();
        match reader.read_u4() {
            Err(ClassFileError::UnexpectedEof(pos)) => assert_eq!(pos, 2),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_bad_magic() {
        let data = [0xDE, 0xAD, 0xBE, 0xEF];
        let mut reader = ByteReader::new(&data);
        assert!(matches!(reader.expect_magic(), Err(ClassFileError::InvalidMagic(0xDEADBEEF))));
    }
}
