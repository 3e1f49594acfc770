use serde::Serialize;

/// Standard success envelope: every 2xx body is `{"data": ...}`, which
/// keeps client-side decoding uniform with the error envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    pub fn new(data: T) -> Self {
        DataResponse { data }
    }
}
