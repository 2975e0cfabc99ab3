use crate::{
    error::{Error, Result},
    output::Output,
    util::content_type,
};
use http::{Method, Uri, Version};
use httparse::Status;
use std::str::FromStr;
use std::time::Instant;
use std::{
    io::{Read, Write},
    net::TcpStream,
    sync::atomic::{AtomicUsize, Ordering},
};

/// Serves `output` from memory until the process is killed.
pub fn serve(start: Instant, addr: &str, output: &Output<'_>) -> Result<()> {
    let listener = std::net::TcpListener::bind(addr).map_err(|source| Error::Bind {
        addr: addr.to_owned(),
        source,
    })?;

    tracing::info!(
        "({:.1}s) Serving on http://{addr}",
        start.elapsed().as_secs_f32()
    );

    let http_threads = &AtomicUsize::new(0);
    std::thread::scope(|scope| loop {
        let stream = match listener.accept() {
            Ok((stream, _)) => stream,
            Err(e) => {
                tracing::debug!("accept failed: {e}");
                continue;
            }
        };
        scope.spawn(move || {
            let _guard = Guard::new(http_threads);
            handle(stream, output);
        });
    })
}

fn handle(mut stream: TcpStream, output: &Output<'_>) {
    let Some(request) = read_request(&mut stream) else {
        return;
    };

    let path = resolve_path(request.uri().path());
    let response = if let Some(file) = output.get(&path) {
        http::Response::builder()
            .version(request.version())
            .status(200)
            .header("Content-Type", content_type(&path))
            .body((**file).clone())
    } else {
        http::Response::builder()
            .version(request.version())
            .status(404)
            .header("Content-Type", "text/plain; charset=utf-8")
            .body(b"not found".to_vec())
    };
    let response = match response {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("couldn't build response for {}: {e}", request.uri());
            return;
        }
    };

    tracing::info!("[{}] {}", response.status(), request.uri());

    let status_line = format!(
        "{:?} {} {}\r\n",
        response.version(),
        response.status().as_u16(),
        response.status().canonical_reason().unwrap_or_default()
    );

    let mut headers = String::new();
    for (name, value) in response.headers() {
        headers.push_str(&format!("{}: {}\r\n", name, value.to_str().unwrap_or("")));
    }

    let body: &[u8] = response.body().as_ref();
    headers.push_str(&format!("Content-Length: {}\r\n\r\n", body.len()));

    if stream.write_all(status_line.as_bytes()).is_err() {
        return;
    }
    if stream.write_all(headers.as_bytes()).is_err() {
        return;
    }
    if stream.write_all(body).is_err() {
        return;
    }
    let _ = stream.flush();
}

fn read_request(stream: &mut TcpStream) -> Option<http::Request<Vec<u8>>> {
    let mut buf = Vec::new();
    loop {
        let mut tmp = [0u8; 1024];
        match stream.read(&mut tmp) {
            Ok(0) | Err(_) => return None,
            Ok(n) => buf.extend_from_slice(&tmp[0..n]),
        };

        let mut headers = [httparse::EMPTY_HEADER; 128];
        let mut parse_req = httparse::Request::new(&mut headers);
        match parse_req.parse(&buf) {
            Ok(Status::Complete(_)) => {}
            Ok(Status::Partial) => continue,
            Err(e) => {
                tracing::debug!("malformed request: {e}");
                return None;
            }
        }

        let method = parse_req.method.and_then(|m| Method::from_str(m).ok())?;
        let uri = parse_req.path.and_then(|p| Uri::from_str(p).ok())?;
        let mut builder = http::Request::builder().method(method).uri(uri).version(
            if parse_req.version == Some(1) {
                Version::HTTP_11
            } else {
                Version::HTTP_10
            },
        );
        for header in parse_req.headers.iter() {
            builder = builder.header(header.name, header.value);
        }
        return builder.body(Vec::new()).ok();
    }
}

/// Directory paths map to their `index.html`.
pub fn resolve_path(path: &str) -> String {
    let mut path = path.to_owned();
    if path.ends_with('/') {
        path.push_str("index.html");
    }
    path
}

struct Guard<'a>(&'a AtomicUsize);

impl<'a> Guard<'a> {
    pub fn new(counter: &'a AtomicUsize) -> Self {
        let active = counter.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::trace!(active, "connection opened");
        Self(counter)
    }
}

impl<'a> Drop for Guard<'a> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn directories_resolve_to_index() {
        assert_eq!(resolve_path("/"), "/index.html");
        assert_eq!(resolve_path("/projects/"), "/projects/index.html");
        assert_eq!(resolve_path("/headshot.jpg"), "/headshot.jpg");
    }
}
