use super::{
    handlers::{auth, health, me, password, signup, users},
    response::ActionResult,
};
use crate::{
    backend::UserProfile,
    forms::{
        ActivationForm, FieldError, ForgotPasswordForm, LoginForm, PasswordChangeForm,
        ProfileForm, ResetPasswordForm, SignupForm,
    },
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        signup::signup,
        signup::activation,
        auth::login,
        auth::logout,
        auth::session,
        password::forgot,
        password::reset,
        users::user,
        me::profile,
        me::password,
    ),
    components(schemas(
        ActionResult,
        FieldError,
        UserProfile,
        health::Health,
        SignupForm,
        ActivationForm,
        LoginForm,
        ForgotPasswordForm,
        ResetPasswordForm,
        ProfileForm,
        PasswordChangeForm,
    )),
    tags(
        (name = "health", description = "Service and upstream API status"),
        (name = "signup", description = "Registration and activation"),
        (name = "auth", description = "Login, logout and session lookup"),
        (name = "password", description = "Password reset for signed-out users"),
        (name = "users", description = "Public profiles"),
        (name = "me", description = "Settings of the signed-in user"),
    )
)]
pub struct ApiDoc;
