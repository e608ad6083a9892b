use std::{
    io::{self, BufRead, Write},
    sync::Mutex,
};

use crate::{
    conf::Settings,
    pkg::internal::{
        adaptors::applications::spec::ApplicationEntry,
        dashboard::{ApplicationsApi, Dashboard, FormFields, HttpApi, Prompt},
        status::ApplicationStatus,
    },
    prelude::{AppError, Result},
};

use super::AddArgs;

struct Terminal<R> {
    assume_yes: bool,
    input: Mutex<R>,
}

impl<R: BufRead> Terminal<R> {
    fn new(input: R, assume_yes: bool) -> Self {
        Terminal {
            assume_yes,
            input: Mutex::new(input),
        }
    }
}

impl<R: BufRead> Prompt for Terminal<R> {
    fn confirm(&self, question: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        print!("{} [y/N] ", question);
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        let Ok(mut input) = self.input.lock() else {
            return false;
        };
        match input.read_line(&mut answer) {
            Ok(_) => matches!(answer.trim(), "y" | "Y" | "yes"),
            Err(_) => false,
        }
    }

    // errors are returned to main, which prints them once
    fn alert(&self, message: &str) {
        tracing::debug!("service error: {}", message);
    }
}

type Board = Dashboard<HttpApi, Terminal<io::StdinLock<'static>>>;

fn open(settings: &Settings, assume_yes: bool) -> Result<Board> {
    let api = HttpApi::new(&settings.api_base_url)?;
    tracing::debug!("using service at {}", &settings.api_base_url);
    Ok(Dashboard::new(api, Terminal::new(io::stdin().lock(), assume_yes)))
}

fn print_row(app: &ApplicationEntry) {
    println!(
        "{}\t{:<10}\t{} / {}\t{}\t{}",
        &app.id,
        app.status.as_str(),
        &app.company,
        &app.role,
        app.location.as_deref().unwrap_or("n/a"),
        app.applied_at.format("%Y-%m-%d"),
    );
}

pub async fn list(settings: &Settings, status: Option<ApplicationStatus>) -> Result<()> {
    let mut board = open(settings, true)?;
    board.set_filter(status).await?;
    if board.applications.is_empty() {
        println!("No applications yet.");
    }
    board.applications.iter().for_each(print_row);
    Ok(())
}

pub async fn add(settings: &Settings, args: AddArgs) -> Result<()> {
    let mut board = open(settings, true)?;
    board.form = FormFields {
        company: args.company,
        role: args.role,
        location: args.location.unwrap_or_default(),
        url: args.url.unwrap_or_default(),
        notes: args.notes.unwrap_or_default(),
        status: args.status,
        applied_at: args.applied_at.unwrap_or_default(),
    };
    let created = board.submit().await?;
    print_row(&created);
    Ok(())
}

async fn apply_status<A: ApplicationsApi, P: Prompt>(
    board: &mut Dashboard<A, P>,
    id: &str,
    status: ApplicationStatus,
) -> Result<ApplicationEntry> {
    board.mount().await?;
    if !board.applications.iter().any(|a| a.id == id) {
        return Err(AppError::NotFound(id.to_string()));
    }
    board.change_status(id, status).await?;
    board
        .applications
        .iter()
        .find(|a| a.id == id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(id.to_string()))
}

pub async fn set_status(settings: &Settings, id: &str, status: ApplicationStatus) -> Result<()> {
    let mut board = open(settings, true)?;
    let app = apply_status(&mut board, id, status).await?;
    print_row(&app);
    Ok(())
}

pub async fn delete(settings: &Settings, id: &str, assume_yes: bool) -> Result<()> {
    let mut board = open(settings, assume_yes)?;
    board.mount().await?;
    if board.delete(id).await? {
        println!("deleted {}", id);
    } else {
        println!("kept {}", id);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{io::Cursor, sync::Arc};

    use super::*;
    use crate::pkg::internal::{
        service::CreateApplicationInput,
        store::{MemoryStore, SharedStore},
    };

    fn terminal(answer: &str, assume_yes: bool) -> Terminal<Cursor<Vec<u8>>> {
        Terminal::new(Cursor::new(answer.as_bytes().to_vec()), assume_yes)
    }

    async fn board_with(
        answer: &str,
        assume_yes: bool,
    ) -> Result<(Dashboard<SharedStore, Terminal<Cursor<Vec<u8>>>>, ApplicationEntry)> {
        let store: SharedStore = Arc::new(MemoryStore::default());
        let created = store
            .create(CreateApplicationInput {
                company: Some("Acme".into()),
                role: Some("Engineer".into()),
                ..Default::default()
            })
            .await?;
        let mut board = Dashboard::new(store, terminal(answer, assume_yes));
        board.mount().await?;
        Ok((board, created))
    }

    #[test]
    fn test_confirm_accepts_only_explicit_yes() {
        assert!(terminal("y\n", false).confirm("Delete?"));
        assert!(terminal("Y\n", false).confirm("Delete?"));
        assert!(terminal("yes\n", false).confirm("Delete?"));
        assert!(!terminal("\n", false).confirm("Delete?"));
        assert!(!terminal("", false).confirm("Delete?"));
        assert!(!terminal("n\n", false).confirm("Delete?"));
        assert!(!terminal("yep\n", false).confirm("Delete?"));
    }

    #[test]
    fn test_assume_yes_skips_the_question() {
        assert!(terminal("", true).confirm("Delete?"));
        assert!(terminal("n\n", true).confirm("Delete?"));
    }

    #[tokio::test]
    async fn test_declined_delete_keeps_record() -> Result<()> {
        let (mut board, created) = board_with("n\n", false).await?;
        assert!(!board.delete(&created.id).await?);
        board.reload().await?;
        assert_eq!(board.applications, vec![created]);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_with_yes_flag_removes_record() -> Result<()> {
        let (mut board, created) = board_with("", true).await?;
        assert!(board.delete(&created.id).await?);
        board.reload().await?;
        assert!(board.applications.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_apply_status_updates_listed_record() -> Result<()> {
        let (mut board, created) = board_with("", true).await?;
        let app = apply_status(&mut board, &created.id, ApplicationStatus::Interview).await?;
        assert_eq!(app.id, created.id);
        assert_eq!(app.status, ApplicationStatus::Interview);
        Ok(())
    }

    #[tokio::test]
    async fn test_apply_status_unknown_id() -> Result<()> {
        let (mut board, _) = board_with("", true).await?;
        let missing = apply_status(&mut board, "missing", ApplicationStatus::Offer).await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
        Ok(())
    }
}
