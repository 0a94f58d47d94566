use crate::image::Image;
use crate::Float;

pub fn draw_points(image: &mut Image, points: &[(usize,usize)], intensity: Float) -> () {
    let width = image.buffer.ncols();
    let height = image.buffer.nrows();
    for &(x,y) in points {
        if x < width && y < height {
            image.buffer[(y,x)] = intensity;
        }
    }
}

pub fn draw_square(image: &mut Image, x: usize, y: usize, side_length: usize) -> () {
    if y + side_length >= image.buffer.nrows() || x + side_length >= image.buffer.ncols() || x < side_length || y < side_length {
        println!("Image width,height = {},{}. Max square width,height: {},{}", image.buffer.ncols(), image.buffer.nrows(),x+side_length,y+side_length);
    } else {
        for i in x-side_length..x+side_length+1 {
            image.buffer[(y + side_length,i)] = 128.0;
            image.buffer[(y - side_length,i)] = 128.0;
        }

        for j in y-side_length+1..y+side_length {
            image.buffer[(j,x + side_length)] = 128.0;
            image.buffer[(j,x - side_length)] = 128.0;
        }
    }
}

pub fn draw_circle(image: &mut Image, x_center: usize, y_center: usize, radius: Float, intensity: Float) -> () {
    let radius = radius.round() as isize;
    let width = image.buffer.ncols() as isize;
    let height = image.buffer.nrows() as isize;
    let x_center = x_center as isize;
    let y_center = y_center as isize;

    // https://www.geeksforgeeks.org/bresenhams-circle-drawing-algorithm/?ref=rp
    let mut x: isize = 0;
    let mut y: isize = radius;
    let mut d = 3 - 2*radius;

    let plot_octants = |x: isize, y: isize, image: &mut Image| {
        for &(dx,dy) in &[(x,y),(y,x),(-x,y),(-y,x),(x,-y),(y,-x),(-x,-y),(-y,-x)] {
            let px = x_center + dx;
            let py = y_center + dy;
            if px >= 0 && px < width && py >= 0 && py < height {
                image.buffer[(py as usize, px as usize)] = intensity;
            }
        }
    };

    plot_octants(x,y,image);
    while y >= x {
        x += 1;
        if d > 0 {
            y -= 1;
            d = d + 4*(x - y) + 10;
        } else {
            d = d + 4*x + 6;
        }
        plot_octants(x,y,image);
    }
}
