use std::io::Write;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

use crate::api::commands::{Command, CommandLine};
use crate::api::render;
use crate::core::session::QuerySession;
use crate::infra::backend::{QueryTransport, SchemaProvider};
use crate::infra::export::save_blob;

#[derive(Debug)]
pub enum Flow {
    Continue(String),
    Quit,
}

/// 执行一条命令。出错时会话状态保持不变，由调用方展示错误信息
pub async fn execute<B>(
    command: Command,
    session: &mut QuerySession,
    backend: &B,
    output_dir: &Path,
) -> anyhow::Result<Flow>
where
    B: SchemaProvider + QueryTransport + Sync + ?Sized,
{
    let out = match command {
        Command::Tables => render::render_tables(session.load_tables(backend).await?),
        Command::Use { table } => {
            session.select_table(backend, &table).await?;
            format!(
                "using {}\n{}",
                table,
                render::render_columns(session.columns())
            )
        }
        Command::Columns { names } => {
            session.select_columns(names)?;
            if session.selected_columns().is_empty() {
                "columns: all".to_string()
            } else {
                format!("columns: {}", session.selected_columns().join(", "))
            }
        }
        Command::Add => {
            session.add_filter()?;
            render::render_filters(session.filters())
        }
        Command::Remove { position } => {
            let id = session.clause_id_at(position)?;
            session.remove_filter(id)?;
            render::render_filters(session.filters())
        }
        Command::Column { position, name } => {
            let id = session.clause_id_at(position)?;
            session.set_filter_column(id, &name)?;
            render::render_filters(session.filters())
        }
        Command::Op { position, operator } => {
            let id = session.clause_id_at(position)?;
            session.set_filter_operator(id, operator)?;
            render::render_filters(session.filters())
        }
        Command::Value { position, text, .. } => {
            let id = session.clause_id_at(position)?;
            session.set_filter_value(id, &text)?;
            render::render_filters(session.filters())
        }
        Command::Range {
            position,
            index,
            text,
            ..
        } => {
            let id = session.clause_id_at(position)?;
            session.set_filter_range_value(id, index, &text)?;
            render::render_filters(session.filters())
        }
        Command::Logic { position, logical } => {
            let id = session.clause_id_at(position)?;
            session.set_filter_logical(id, logical)?;
            render::render_filters(session.filters())
        }
        Command::Filters => render::render_filters(session.filters()),
        Command::Operators { position } => {
            let id = session.clause_id_at(position)?;
            render::render_operators(session.operators_for_filter(id)?)
        }
        Command::Request => {
            let request = session.build_request(None)?;
            serde_json::to_string_pretty(&request)?
        }
        Command::Preview => {
            let result = session.preview(backend).await?;
            render::render_preview(&result)
        }
        Command::Download { file_type } => {
            let bytes = session.download(backend, file_type).await?;
            let path = save_blob(output_dir, file_type, &bytes).await?;
            format!("saved {}", path.display())
        }
        Command::Clear => {
            session.clear_filters();
            "filters cleared".to_string()
        }
        Command::Quit => return Ok(Flow::Quit),
    };
    Ok(Flow::Continue(out))
}

/// 单线程事件循环：逐行读取 stdin，一行一个操作
pub async fn run<B>(session: &mut QuerySession, backend: &B, output_dir: &Path) -> anyhow::Result<()>
where
    B: SchemaProvider + QueryTransport + Sync + ?Sized,
{
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("qb> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }
        debug!("命令: {}", line.trim());

        let command = match CommandLine::parse_line(&line) {
            Ok(parsed) => parsed.command,
            Err(e) => {
                // clap 的 help 也走这里
                println!("{}", e.render());
                continue;
            }
        };

        match execute(command, session, backend, output_dir).await {
            Ok(Flow::Continue(out)) => println!("{}", out),
            Ok(Flow::Quit) => break,
            Err(e) => {
                warn!("命令执行失败: {:#}", e);
                println!("error: {:#}", e);
            }
        }
    }
    Ok(())
}
