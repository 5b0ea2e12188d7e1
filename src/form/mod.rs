pub mod controller;
pub mod state;
pub mod validate;

pub use self::controller::{
    AuthFormController, ChainedErrorSlot, SignInRequest, SignUpRequest, SignedIn, SubmitError,
};
pub use self::state::{
    AuthFormState, FormKind, FormPhase, FormSlot, SignInFields, SignUpFields, ViewState,
};
pub use self::validate::{Field, FieldError, FieldErrors, validate_sign_in, validate_sign_up};
