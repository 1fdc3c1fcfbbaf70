use std::path::PathBuf;

use console::style;

use crate::cli::commands::{LoginArgs, SignupArgs};
use crate::errors::DefensisError;
use crate::session::{AuthSession, SessionStore};

pub async fn handle_login(args: LoginArgs, session_dir: PathBuf) -> Result<(), DefensisError> {
    let mut session = AuthSession::restore(SessionStore::new(session_dir)).await?;
    if !session.login(&args.email, &args.password).await? {
        return Err(DefensisError::Session("Email and password are required".into()));
    }
    print_user(&session);
    Ok(())
}

pub async fn handle_signup(args: SignupArgs, session_dir: PathBuf) -> Result<(), DefensisError> {
    let mut session = AuthSession::restore(SessionStore::new(session_dir)).await?;
    if !session.signup(&args.email, &args.password, &args.name).await? {
        return Err(DefensisError::Session("Email, password and name are required".into()));
    }
    print_user(&session);
    Ok(())
}

pub async fn handle_logout(session_dir: PathBuf) -> Result<(), DefensisError> {
    let mut session = AuthSession::restore(SessionStore::new(session_dir)).await?;
    session.logout().await?;
    println!("Signed out");
    Ok(())
}

pub async fn handle_whoami(session_dir: PathBuf) -> Result<(), DefensisError> {
    let session = AuthSession::restore(SessionStore::new(session_dir)).await?;
    if session.is_authenticated() {
        print_user(&session);
    } else {
        println!("Not signed in");
    }
    Ok(())
}

fn print_user(session: &AuthSession) {
    if let Some(user) = session.user() {
        println!(
            "{} {} <{}> ({} plan)",
            style("●").green(),
            style(&user.name).bold(),
            user.email,
            user.plan
        );
    }
}
