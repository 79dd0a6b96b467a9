use std::sync::mpsc;
use std::sync::{ Arc, Mutex };
use std::thread;

use log::info;

use crate::canvas::Canvas;
use crate::scene::Scene;

enum Message {
    Row(usize),
    Terminate,
}

struct Worker {
    thread: Option<thread::JoinHandle<()>>,
}

impl Worker {
    fn new(scene: Arc<Scene>, canvas: Arc<Mutex<Canvas>>,
        receiver: Arc<Mutex<mpsc::Receiver<Message>>>) -> Worker {
        let thread = thread::spawn(move || loop {
            let message = receiver.lock().unwrap().recv().unwrap();

            match message {
                Message::Row(v) => {
                    // Shade the whole row before taking the canvas lock,
                    // so workers spend their time tracing, not waiting.
                    let row = scene.render_row(v);

                    let mut canvas = canvas.lock().unwrap();
                    for (u, colour) in row.iter().enumerate() {
                        canvas.write_pixel(u, v, colour);
                    }
                },

                Message::Terminate => break,
            }
        });

        Worker { thread: Some(thread) }
    }
}

struct ThreadPool {
    workers: Vec<Worker>,
    sender: mpsc::Sender<Message>,
}

impl ThreadPool {
    fn new(size: usize, scene: Arc<Scene>, canvas: Arc<Mutex<Canvas>>)
        -> ThreadPool {
        assert!(size > 0);

        let (sender, receiver) = mpsc::channel();
        let receiver = Arc::new(Mutex::new(receiver));

        let mut workers = Vec::with_capacity(size);
        for _ in 0..size {
            workers.push(Worker::new(
                Arc::clone(&scene),
                Arc::clone(&canvas),
                Arc::clone(&receiver),
            ));
        }

        ThreadPool { workers, sender }
    }

    fn execute(&self, message: Message) {
        self.sender.send(message).unwrap();
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        for _ in &self.workers {
            self.sender.send(Message::Terminate).unwrap();
        }

        for worker in &mut self.workers {
            if let Some(thread) = worker.thread.take() {
                thread.join().unwrap();
            }
        }
    }
}

/// Renders the scene row-by-row across a pool of worker threads.
///
/// Rows are independent: each pixel's shading reads only scene state that
/// is immutable during the render, so workers share the scene freely and
/// serialize only on canvas writes. The output is identical to
/// `Scene::render` regardless of the thread count.
pub fn parallel_render(scene: Arc<Scene>, threads: usize) -> Canvas {
    let width = scene.render_width as usize;
    let height = scene.render_height as usize;
    let canvas = Arc::new(Mutex::new(Canvas::new(width, height)));

    info!("rendering {}x{} image using {} threads", width, height, threads);
    {
        let pool = ThreadPool::new(threads, scene, Arc::clone(&canvas));
        for v in 0..height {
            pool.execute(Message::Row(v));
        }

        // Dropping the pool sends the terminate messages and joins the
        // workers, so every row is finished past this scope.
    }

    let canvas = Arc::try_unwrap(canvas)
        .expect("Workers have exited, so no other canvas handles remain.");
    canvas.into_inner().unwrap()
}

/* Tests */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use crate::color::Color;
    use crate::light::LightSource;
    use crate::shape::Shape;
    use crate::tuple::Tuple4D;

    #[test]
    fn matches_serial_render() {
        let mut scene = Scene::new();
        scene.render_width = 16;
        scene.render_height = 12;
        scene.background_colour = Color::rgb(0.1, 0.1, 0.3);

        let mut camera = Camera::pinhole(1.0);
        camera.transform.translate(0.0, 0.0, -4.0);
        scene.set_camera(camera);

        let mut ball = Shape::sphere();
        ball.material.diffuse = Color::rgb(0.8, 0.2, 0.2);
        scene.add_object(ball);

        scene.add_light(LightSource::point(
            Color::rgb(40.0, 40.0, 40.0),
            Tuple4D::point(3.0, 3.0, -3.0),
        ));

        let serial = scene.render();
        let parallel = parallel_render(Arc::new(scene), 3);

        assert_eq!(serial, parallel);
    }
}
