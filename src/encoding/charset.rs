//! Supported charsets and label lookup

use std::fmt;

/// A byte-to-character encoding from the supported set
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Charset {
    Utf8,
    Utf16Le,
    Utf16Be,
    Iso8859_1,
    Iso8859_2,
    Iso8859_7,
    Iso8859_9,
    Iso8859_15,
    ShiftJis,
    EucKr,
    Gb18030,
    Big5,
    Tis620,
    Koi8R,
    Windows1250,
    Windows1251,
    Windows1252,
    Windows1253,
    Windows1254,
    Windows1255,
    Windows1256,
    Windows1257,
    Windows1258,
}

impl Charset {
    /// Every supported charset, in menu order
    pub const ALL: [Charset; 23] = [
        Charset::Utf8,
        Charset::Utf16Le,
        Charset::Utf16Be,
        Charset::Iso8859_1,
        Charset::Iso8859_2,
        Charset::Iso8859_7,
        Charset::Iso8859_9,
        Charset::Iso8859_15,
        Charset::ShiftJis,
        Charset::EucKr,
        Charset::Gb18030,
        Charset::Big5,
        Charset::Tis620,
        Charset::Koi8R,
        Charset::Windows1250,
        Charset::Windows1251,
        Charset::Windows1252,
        Charset::Windows1253,
        Charset::Windows1254,
        Charset::Windows1255,
        Charset::Windows1256,
        Charset::Windows1257,
        Charset::Windows1258,
    ];

    /// Canonical display name
    pub fn name(self) -> &'static str {
        match self {
            Charset::Utf8 => "UTF-8",
            Charset::Utf16Le => "UTF-16LE",
            Charset::Utf16Be => "UTF-16BE",
            Charset::Iso8859_1 => "ISO-8859-1",
            Charset::Iso8859_2 => "ISO-8859-2",
            Charset::Iso8859_7 => "ISO-8859-7",
            Charset::Iso8859_9 => "ISO-8859-9",
            Charset::Iso8859_15 => "ISO-8859-15",
            Charset::ShiftJis => "Shift_JIS",
            Charset::EucKr => "EUC-KR",
            Charset::Gb18030 => "GB18030",
            Charset::Big5 => "Big5",
            Charset::Tis620 => "TIS-620",
            Charset::Koi8R => "KOI8-R",
            Charset::Windows1250 => "windows-1250",
            Charset::Windows1251 => "windows-1251",
            Charset::Windows1252 => "windows-1252",
            Charset::Windows1253 => "windows-1253",
            Charset::Windows1254 => "windows-1254",
            Charset::Windows1255 => "windows-1255",
            Charset::Windows1256 => "windows-1256",
            Charset::Windows1257 => "windows-1257",
            Charset::Windows1258 => "windows-1258",
        }
    }

    /// Additional lowercase labels accepted by [`Charset::from_label`]
    fn aliases(self) -> &'static [&'static str] {
        match self {
            Charset::Utf8 => &["utf8", "ascii", "us-ascii"],
            Charset::Utf16Le => &["utf-16", "utf16", "utf16le"],
            Charset::Utf16Be => &["utf16be"],
            Charset::Iso8859_1 => &["latin1", "iso8859-1", "iso_8859-1", "l1"],
            Charset::Iso8859_2 => &["latin2", "iso8859-2", "iso_8859-2", "l2"],
            Charset::Iso8859_7 => &["greek", "iso8859-7", "iso_8859-7"],
            Charset::Iso8859_9 => &["latin5", "iso8859-9", "iso_8859-9", "l5"],
            Charset::Iso8859_15 => &["latin9", "iso8859-15", "iso_8859-15"],
            Charset::ShiftJis => &["shiftjis", "sjis", "shift-jis", "ms_kanji"],
            Charset::EucKr => &["euckr", "ks_c_5601-1987"],
            Charset::Gb18030 => &["gbk", "gb2312"],
            Charset::Big5 => &["big5-hkscs"],
            Charset::Tis620 => &["tis620", "windows-874", "iso-8859-11"],
            Charset::Koi8R => &["koi8r", "koi8"],
            Charset::Windows1250 => &["cp1250"],
            Charset::Windows1251 => &["cp1251"],
            Charset::Windows1252 => &["cp1252"],
            Charset::Windows1253 => &["cp1253"],
            Charset::Windows1254 => &["cp1254"],
            Charset::Windows1255 => &["cp1255"],
            Charset::Windows1256 => &["cp1256"],
            Charset::Windows1257 => &["cp1257"],
            Charset::Windows1258 => &["cp1258"],
        }
    }

    /// Look up a charset by name or alias, ignoring case and surrounding whitespace
    pub fn from_label(label: &str) -> Option<Charset> {
        let label = label.trim().to_ascii_lowercase();
        Charset::ALL.into_iter().find(|charset| {
            charset.name().eq_ignore_ascii_case(&label) || charset.aliases().contains(&label.as_str())
        })
    }

    /// The `encoding_rs` codec backing this charset
    ///
    /// ISO-8859-1 has no exact `encoding_rs` codec (the WHATWG label maps to
    /// windows-1252), so the converter handles it directly and this returns `None`.
    pub fn codec(self) -> Option<&'static encoding_rs::Encoding> {
        let codec = match self {
            Charset::Utf8 => encoding_rs::UTF_8,
            Charset::Utf16Le => encoding_rs::UTF_16LE,
            Charset::Utf16Be => encoding_rs::UTF_16BE,
            Charset::Iso8859_1 => return None,
            Charset::Iso8859_2 => encoding_rs::ISO_8859_2,
            Charset::Iso8859_7 => encoding_rs::ISO_8859_7,
            Charset::Iso8859_9 => encoding_rs::WINDOWS_1254,
            Charset::Iso8859_15 => encoding_rs::ISO_8859_15,
            Charset::ShiftJis => encoding_rs::SHIFT_JIS,
            Charset::EucKr => encoding_rs::EUC_KR,
            Charset::Gb18030 => encoding_rs::GB18030,
            Charset::Big5 => encoding_rs::BIG5,
            Charset::Tis620 => encoding_rs::WINDOWS_874,
            Charset::Koi8R => encoding_rs::KOI8_R,
            Charset::Windows1250 => encoding_rs::WINDOWS_1250,
            Charset::Windows1251 => encoding_rs::WINDOWS_1251,
            Charset::Windows1252 => encoding_rs::WINDOWS_1252,
            Charset::Windows1253 => encoding_rs::WINDOWS_1253,
            Charset::Windows1254 => encoding_rs::WINDOWS_1254,
            Charset::Windows1255 => encoding_rs::WINDOWS_1255,
            Charset::Windows1256 => encoding_rs::WINDOWS_1256,
            Charset::Windows1257 => encoding_rs::WINDOWS_1257,
            Charset::Windows1258 => encoding_rs::WINDOWS_1258,
        };
        Some(codec)
    }

    /// Map a codec reported by statistical detection back into the supported set
    pub fn from_codec(codec: &'static encoding_rs::Encoding) -> Option<Charset> {
        if codec == encoding_rs::GBK {
            return Some(Charset::Gb18030);
        }
        Charset::ALL
            .into_iter()
            // ISO-8859-9 shares its codec with windows-1254; report the latter
            .filter(|charset| *charset != Charset::Iso8859_9)
            .find(|charset| charset.codec() == Some(codec))
    }

    /// Check if this is one of the UTF encodings
    pub fn is_unicode(self) -> bool {
        matches!(self, Charset::Utf8 | Charset::Utf16Le | Charset::Utf16Be)
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The set of charsets offered to documents, injected into the converter
#[derive(Clone, Debug)]
pub struct CharsetRegistry {
    supported: Vec<Charset>,
}

impl CharsetRegistry {
    /// Registry restricted to the given charsets
    pub fn new(supported: Vec<Charset>) -> Self {
        Self { supported }
    }

    /// Resolve a label to a charset, if it is both known and supported
    pub fn lookup(&self, label: &str) -> Option<Charset> {
        Charset::from_label(label).filter(|charset| self.supports(*charset))
    }

    /// Check if a charset is offered by this registry
    pub fn supports(&self, charset: Charset) -> bool {
        self.supported.contains(&charset)
    }

    /// All supported charsets
    pub fn charsets(&self) -> &[Charset] {
        &self.supported
    }
}

impl Default for CharsetRegistry {
    fn default() -> Self {
        Self::new(Charset::ALL.to_vec())
    }
}
