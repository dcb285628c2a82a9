//! Pre-serialized `multipart/form-data` bodies

use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Read};

use bytes::Bytes;
use courier_common::Values;
use uuid::Uuid;

use crate::error::HttpResult;

const DEFAULT_FILE_CONTENT_TYPE: &str = "application/octet-stream";

/// A named file part backed by a borrowed reader.
///
/// The reader is only used while [`MultipartBody::build`] runs; closing it
/// stays with the caller.
pub struct File<'a> {
    name: String,
    reader: &'a mut dyn Read,
    content_type: Option<String>,
}

impl<'a> File<'a> {
    /// Pair a file name with the stream holding its contents
    pub fn new(name: impl Into<String>, reader: &'a mut dyn Read) -> Self {
        Self {
            name: name.into(),
            reader,
            content_type: None,
        }
    }

    /// Override the part's Content-Type (default `application/octet-stream`)
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for File<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("File")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

/// Form field name to the files uploaded under it
pub type FileMap<'a> = BTreeMap<String, Vec<File<'a>>>;

/// An immutable, single-use `multipart/form-data` payload.
///
/// Built once from form fields and files, then moved into exactly one
/// request by `post_multipart`/`put_multipart`.
pub struct MultipartBody {
    boundary: String,
    data: Bytes,
}

impl MultipartBody {
    /// Serialize `params` and `files` behind a freshly generated boundary.
    ///
    /// Fields are written first, keys in sorted order, followed by the file
    /// parts. Fails with `HttpError::Io` if any reader errors before EOF.
    pub fn build(params: Option<&Values>, files: Option<FileMap<'_>>) -> HttpResult<Self> {
        let boundary = format!("courier-{}", Uuid::new_v4().simple());
        let mut writer = PartWriter::new(&boundary);

        if let Some(params) = params {
            for (key, value) in params.pairs() {
                writer.field(key, value.as_bytes());
            }
        }

        if let Some(files) = files {
            for (field, entries) in files {
                for file in entries {
                    writer.file(&field, file)?;
                }
            }
        }

        Ok(Self {
            data: writer.finish(),
            boundary,
        })
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Value for the request's Content-Type header
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// The serialized payload
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub(crate) fn into_bytes(self) -> Bytes {
        self.data
    }
}

impl fmt::Debug for MultipartBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultipartBody")
            .field("boundary", &self.boundary)
            .field("len", &self.data.len())
            .finish()
    }
}

/// Writes parts with the CRLF framing used by `multipart/form-data`
struct PartWriter<'b> {
    boundary: &'b str,
    buf: Vec<u8>,
    parts: usize,
}

impl<'b> PartWriter<'b> {
    fn new(boundary: &'b str) -> Self {
        Self {
            boundary,
            buf: Vec::new(),
            parts: 0,
        }
    }

    fn open_part(&mut self, disposition: &str, content_type: Option<&str>) {
        if self.parts > 0 {
            self.buf.extend_from_slice(b"\r\n");
        }
        self.parts += 1;
        self.buf.extend_from_slice(b"--");
        self.buf.extend_from_slice(self.boundary.as_bytes());
        self.buf.extend_from_slice(b"\r\nContent-Disposition: ");
        self.buf.extend_from_slice(disposition.as_bytes());
        self.buf.extend_from_slice(b"\r\n");
        if let Some(content_type) = content_type {
            self.buf.extend_from_slice(b"Content-Type: ");
            self.buf.extend_from_slice(content_type.as_bytes());
            self.buf.extend_from_slice(b"\r\n");
        }
        self.buf.extend_from_slice(b"\r\n");
    }

    fn field(&mut self, name: &str, value: &[u8]) {
        let disposition = format!("form-data; name=\"{}\"", escape_quotes(name));
        self.open_part(&disposition, None);
        self.buf.extend_from_slice(value);
    }

    fn file(&mut self, field: &str, file: File<'_>) -> io::Result<()> {
        let disposition = format!(
            "form-data; name=\"{}\"; filename=\"{}\"",
            escape_quotes(field),
            escape_quotes(&file.name)
        );
        let content_type = file
            .content_type
            .as_deref()
            .unwrap_or(DEFAULT_FILE_CONTENT_TYPE);
        self.open_part(&disposition, Some(content_type));
        io::copy(file.reader, &mut self.buf)?;
        Ok(())
    }

    fn finish(mut self) -> Bytes {
        if self.parts > 0 {
            self.buf.extend_from_slice(b"\r\n");
        }
        self.buf.extend_from_slice(b"--");
        self.buf.extend_from_slice(self.boundary.as_bytes());
        self.buf.extend_from_slice(b"--\r\n");
        Bytes::from(self.buf)
    }
}

fn escape_quotes(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
