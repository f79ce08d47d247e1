/// Settings for a container
/// ## Fields
/// - `invoke_err_check`:
///   If `true`, the error-capable return of an invoked function or setter
///   is inspected and a returned error fails the operation.
///
///   If `false`, the call still happens and its side effects stand,
///   but a returned error is discarded.
#[derive(Clone, Copy, Default)]
pub struct Settings {
    pub invoke_err_check: bool,
}
