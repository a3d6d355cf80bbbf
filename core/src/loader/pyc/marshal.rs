//! Minimal marshal deserializer: just enough of CPython's serialization
//! format to pull code objects (and the consts they nest) out of a module
//! payload.

use super::PycError;
use std::rc::Rc;

/// FLAG_REF bit: the value is entered into the back-reference table.
const FLAG_REF: u8 = 0x80;

/// Guard against adversarial deeply nested containers; real module payloads
/// stay far below this.
const MAX_MARSHAL_DEPTH: u32 = 200;

#[derive(Debug, Clone)]
pub(crate) enum Value {
    /// TYPE_NULL; only appears as a dict terminator.
    Null,
    None,
    Ellipsis,
    StopIteration,
    Bool(bool),
    Int(i64),
    Float(f64),
    Complex(f64, f64),
    Bytes(Vec<u8>),
    Str(String),
    Tuple(Vec<Value>),
    FrozenSet(Vec<Value>),
    Dict(Vec<(Value, Value)>),
    Code(Rc<RawCode>),
}

/// The code-object fields the disassembler needs; the rest are read (the
/// wire format is positional) and dropped.
#[derive(Debug)]
pub(crate) struct RawCode {
    pub code: Vec<u8>,
    pub consts: Vec<Value>,
    pub name: String,
    pub firstlineno: i32,
    pub linetable: Vec<u8>,
}

pub(crate) fn read_top_level(buf: &[u8]) -> Result<Value, PycError> {
    let mut reader = Reader {
        buf,
        pos: 0,
        refs: Vec::new(),
    };
    reader.read_object(0)
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
    refs: Vec<Value>,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], PycError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.buf.len())
            .ok_or(PycError::Truncated { offset: self.pos })?;
        let slice = &self.buf[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn read_u8(&mut self) -> Result<u8, PycError> {
        Ok(self.take(1)?[0])
    }

    fn read_u16(&mut self) -> Result<u16, PycError> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    fn read_u32(&mut self) -> Result<u32, PycError> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_i32(&mut self) -> Result<i32, PycError> {
        Ok(self.read_u32()? as i32)
    }

    fn read_f64(&mut self) -> Result<f64, PycError> {
        let b = self.take(8)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(b);
        Ok(f64::from_le_bytes(raw))
    }

    fn read_len(&mut self) -> Result<usize, PycError> {
        let len = self.read_u32()? as usize;
        // A length cannot exceed the bytes that remain.
        if len > self.buf.len().saturating_sub(self.pos) {
            return Err(PycError::Truncated { offset: self.pos });
        }
        Ok(len)
    }

    fn read_str(&mut self, len: usize) -> Result<String, PycError> {
        let offset = self.pos;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| PycError::InvalidString { offset })
    }

    /// Reads one marshal value. `r_object` in CPython terms: the FLAG_REF
    /// bit enters the value into the back-reference table, with container
    /// types reserving their slot before their elements are read.
    fn read_object(&mut self, depth: u32) -> Result<Value, PycError> {
        if depth >= MAX_MARSHAL_DEPTH {
            return Err(PycError::TooDeep {
                limit: MAX_MARSHAL_DEPTH,
            });
        }

        let offset = self.pos;
        let raw = self.read_u8()?;
        let flag_ref = raw & FLAG_REF != 0;
        let code = raw & !FLAG_REF;

        let reserved = if flag_ref && is_container(code) {
            self.refs.push(Value::Null);
            Some(self.refs.len() - 1)
        } else {
            None
        };

        let value = match code {
            b'0' => Value::Null,
            b'N' => Value::None,
            b'.' => Value::Ellipsis,
            b'S' => Value::StopIteration,
            b'F' => Value::Bool(false),
            b'T' => Value::Bool(true),
            b'i' => Value::Int(self.read_i32()? as i64),
            b'g' => Value::Float(self.read_f64()?),
            b'y' => Value::Complex(self.read_f64()?, self.read_f64()?),
            b'l' => self.read_long()?,
            b's' => {
                let len = self.read_len()?;
                Value::Bytes(self.take(len)?.to_vec())
            }
            b't' | b'u' | b'a' | b'A' => {
                let len = self.read_len()?;
                Value::Str(self.read_str(len)?)
            }
            b'z' | b'Z' => {
                let len = self.read_u8()? as usize;
                Value::Str(self.read_str(len)?)
            }
            b'(' | b'[' => {
                let len = self.read_len()?;
                Value::Tuple(self.read_seq(len, depth)?)
            }
            b')' => {
                let len = self.read_u8()? as usize;
                Value::Tuple(self.read_seq(len, depth)?)
            }
            b'<' | b'>' => {
                let len = self.read_len()?;
                Value::FrozenSet(self.read_seq(len, depth)?)
            }
            b'{' => self.read_dict(depth)?,
            b'r' => {
                let index = self.read_u32()?;
                return self
                    .refs
                    .get(index as usize)
                    .cloned()
                    .ok_or(PycError::BadReference { index });
            }
            b'c' => Value::Code(Rc::new(self.read_code(depth)?)),
            other => {
                return Err(PycError::UnknownTypeCode {
                    code: other,
                    offset,
                });
            }
        };

        if flag_ref {
            match reserved {
                Some(slot) => self.refs[slot] = value.clone(),
                None => self.refs.push(value.clone()),
            }
        }
        Ok(value)
    }

    fn read_seq(&mut self, len: usize, depth: u32) -> Result<Vec<Value>, PycError> {
        let mut items = Vec::with_capacity(len.min(1024));
        for _ in 0..len {
            items.push(self.read_object(depth + 1)?);
        }
        Ok(items)
    }

    fn read_dict(&mut self, depth: u32) -> Result<Value, PycError> {
        let mut entries = Vec::new();
        loop {
            let key = self.read_object(depth + 1)?;
            if matches!(key, Value::Null) {
                return Ok(Value::Dict(entries));
            }
            let value = self.read_object(depth + 1)?;
            entries.push((key, value));
        }
    }

    /// TYPE_LONG: a size-prefixed sequence of 15-bit digits. Magnitudes
    /// beyond i64 are clamped; const values never feed the comparison, only
    /// their opcode footprint does.
    fn read_long(&mut self) -> Result<Value, PycError> {
        let size = self.read_i32()?;
        let negative = size < 0;
        let ndigits = size.unsigned_abs() as usize;

        let mut magnitude: i128 = 0;
        let mut shift = 0u32;
        for _ in 0..ndigits {
            let digit = self.read_u16()? as i128;
            if shift < 127 {
                magnitude = magnitude.saturating_add(digit << shift);
            }
            shift = shift.saturating_add(15);
        }
        if negative {
            magnitude = -magnitude;
        }
        Ok(Value::Int(
            magnitude.clamp(i64::MIN as i128, i64::MAX as i128) as i64,
        ))
    }

    /// The CPython 3.10 code-object wire layout, field by field.
    fn read_code(&mut self, depth: u32) -> Result<RawCode, PycError> {
        for _ in 0..6 {
            // argcount, posonlyargcount, kwonlyargcount, nlocals, stacksize,
            // flags.
            self.read_i32()?;
        }

        let code = match self.read_object(depth + 1)? {
            Value::Bytes(bytes) => bytes,
            _ => return Err(PycError::BadCodeField { field: "code" }),
        };
        let consts = match self.read_object(depth + 1)? {
            Value::Tuple(items) => items,
            _ => return Err(PycError::BadCodeField { field: "consts" }),
        };
        for field in ["names", "varnames", "freevars", "cellvars"] {
            match self.read_object(depth + 1)? {
                Value::Tuple(_) => {}
                _ => return Err(PycError::BadCodeField { field }),
            }
        }
        match self.read_object(depth + 1)? {
            Value::Str(_) => {}
            _ => return Err(PycError::BadCodeField { field: "filename" }),
        }
        let name = match self.read_object(depth + 1)? {
            Value::Str(name) => name,
            _ => return Err(PycError::BadCodeField { field: "name" }),
        };
        let firstlineno = self.read_i32()?;
        let linetable = match self.read_object(depth + 1)? {
            Value::Bytes(bytes) => bytes,
            _ => return Err(PycError::BadCodeField { field: "linetable" }),
        };

        Ok(RawCode {
            code,
            consts,
            name,
            firstlineno,
            linetable,
        })
    }
}

fn is_container(code: u8) -> bool {
    matches!(code, b'(' | b')' | b'[' | b'<' | b'>' | b'{' | b'c')
}
