use std::{io, time::Duration};
use tokio::{
    io::AsyncReadExt,
    net::{TcpListener, TcpStream},
    runtime,
};
use valve::{
    DeferredResponse, HeaderMap, PipeOptions, SetOptions,
    sink::H1Sink,
    source,
};

fn main() -> io::Result<()> {
    env_logger::init();

    runtime::Builder::new_current_thread()
        .enable_io()
        .enable_time()
        .build()?
        .block_on(async {
            let io = TcpListener::bind("0.0.0.0:3000").await?;
            println!("listening on 0.0.0.0:3000");

            loop {
                let (stream, _) = io.accept().await?;
                if let Err(err) = handle(stream).await {
                    eprintln!("connection error: {err}");
                }
            }
        })
}

/// Answer with a body that starts flowing before the status is decided.
async fn handle(mut stream: TcpStream) -> io::Result<()> {
    // drain the request head, the reply does not depend on it
    let mut buf = Vec::with_capacity(1024);
    stream.read_buf(&mut buf).await?;

    let (tx, body) = source::channel();
    let res = DeferredResponse::new(body);

    let pipe = res.pipe(H1Sink::new(stream), PipeOptions::default());

    let produce = async {
        let payload = "deferred hello\n";
        tx.send(payload);
        drop(tx);

        // pretend the status depends on work that outlives the body
        tokio::time::sleep(Duration::from_millis(50)).await;

        let mut headers = HeaderMap::new();
        headers.insert("content-length", payload.len().to_string());
        headers.insert("connection", "close");
        res.set_headers(headers, SetOptions { trigger: false });
        res.set_status(200, None, SetOptions::default());
    };

    let (piped, ()) = tokio::join!(pipe, produce);
    piped?;
    Ok(())
}
