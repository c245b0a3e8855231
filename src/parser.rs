pub(crate) mod xml;

pub(crate) type ParserResult<T> = Result<T, quick_xml::Error>;
