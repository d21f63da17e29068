//! Byte streams and scoped release

use std::io::Cursor;
use valuekit::io::{
    transfer, with_resource, ByteArrayInputStream, ByteArrayOutputStream, ReaderInputStream,
    WriterOutputStream,
};
use valuekit::prelude::*;

#[test]
fn test_copy_through_adapters() {
    let mut input = ReaderInputStream::new(Cursor::new(b"stream me".to_vec()));
    let mut output = WriterOutputStream::new(Vec::new());
    assert_eq!(transfer(&mut input, &mut output).unwrap(), 9);
    assert_eq!(output.into_inner().unwrap(), b"stream me".to_vec());
}

#[test]
fn test_scoped_guard_closes_on_early_return() {
    fn first_byte(bytes: Vec<u8>) -> Result<Option<u8>> {
        let mut s = Scoped::new(ByteArrayInputStream::new(bytes));
        let b = s.read()?;
        Ok(b)
    }
    assert_eq!(first_byte(vec![4, 5]).unwrap(), Some(4));
    assert_eq!(first_byte(Vec::new()).unwrap(), None);
}

#[test]
fn test_with_resource_reports_body_error() {
    let result: Result<()> = with_resource(ByteArrayOutputStream::new(), |out| {
        out.write_buffer(b"partial")?;
        Err(Error::illegal_state("abort"))
    });
    assert!(result.unwrap_err().is_illegal_state());
}

#[test]
fn test_bounded_mark() {
    let mut s = ReaderInputStream::new(Cursor::new(vec![1, 2, 3, 4, 5, 6]));
    s.mark(4);
    let mut buf = [0u8; 3];
    assert_eq!(s.read_buffer(&mut buf).unwrap(), Some(3));
    s.reset().unwrap();
    assert_eq!(s.read().unwrap(), Some(1));
    assert_eq!(s.skip(10).unwrap(), 5);
    assert!(s.reset().unwrap_err().is_io());
}
